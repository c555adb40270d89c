pub mod auth_service;
pub mod catalog_service;
pub mod desk;
pub mod operation_service;
pub mod shift_log_service;
pub mod shift_service;
