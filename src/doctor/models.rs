use serde::Serialize;
use sqlx::FromRow;

/// Database model for doctors table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DoctorModel {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String, // Unique, used as the login identifier
    pub phonenumber: String,
    pub department: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Doctor row ready for insertion, password already hashed
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phonenumber: String,
    pub department: String,
    pub password_hash: String,
}
