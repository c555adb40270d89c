pub mod access;
pub mod backend;
pub mod cli;
pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod params;
pub mod phone;
pub mod response;
pub mod services;
pub mod session;
pub mod state;
