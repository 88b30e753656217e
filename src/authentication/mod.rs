//! src/authentication/mod.rs
mod middleware;
mod password;
mod service;
mod token;

pub use middleware::{authorize, reject_anonymous_users, AuthContext};
pub use password::PasswordHasher;
pub use service::{CredentialService, Credentials};
pub use token::{Claims, TokenError, TokenIssuer, MIN_SECRET_LENGTH};
