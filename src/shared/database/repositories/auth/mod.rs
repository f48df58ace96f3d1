// Auth repositories
pub mod account_repository;
pub mod in_memory;
pub mod session_repository;

pub use account_repository::*;
pub use in_memory::*;
pub use session_repository::*;
