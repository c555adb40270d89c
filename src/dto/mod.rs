pub mod auth;
pub mod masters;
pub mod operations;
