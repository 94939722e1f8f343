// Public API - what other modules can use
pub use handlers::{login_doctor, register_doctor};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
