// Library crate for the clinic backend
// This file exposes the public API for the binary and integration tests

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod doctor;
pub mod program;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use auth::{DoctorClaims, TokenConfig};
pub use config::AppConfig;
pub use shared::{AppError, AppState};
