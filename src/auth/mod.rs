// Public API - what other modules can use
pub use middleware::jwt_auth;
pub use password::{hash_password, verify_password};
pub use token::TokenConfig;
pub use types::DoctorClaims;

// Internal modules
mod middleware;
mod password;
mod token;
mod types;
