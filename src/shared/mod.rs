// Shared module
pub mod clock;
pub mod config;
pub mod database;
pub mod errors;
pub mod layers;
pub mod middleware;
pub mod services;
pub mod utils;

pub use errors::*;
pub use services::*;
