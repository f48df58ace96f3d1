// Auth domain models
pub mod account;
pub mod auth;
pub mod claims;
pub mod session;

pub use account::*;
pub use auth::*;
pub use claims::*;
pub use session::*;
