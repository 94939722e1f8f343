// Public API - what other modules can use
pub use handlers::{
    create_prescription, delete_client, enroll_client, list_clients, list_prescriptions,
    register_client, search_client, update_client, update_prescription,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
