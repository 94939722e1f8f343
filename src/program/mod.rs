// Public API - what other modules can use
pub use handlers::{list_programs, register_program};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
