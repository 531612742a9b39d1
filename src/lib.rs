pub mod cli;
pub mod config;
pub mod errors;
pub mod postgres;
pub mod services;
pub mod types;
pub mod utils;
