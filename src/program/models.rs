use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for programs table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ProgramModel {
    pub id: i64,
    pub name: String,     // Unique, used as the lookup key for enrollment
    pub symptoms: String, // Free-text description
    pub severity: i32,
}
