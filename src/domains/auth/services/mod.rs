// Auth domain services
pub mod auth_service;
pub mod credential_hasher;
pub mod jwt_service;
pub mod session_sweeper;
pub mod state;

pub use auth_service::*;
pub use credential_hasher::*;
pub use jwt_service::*;
pub use session_sweeper::*;
pub use state::*;
