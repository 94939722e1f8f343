use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::program::models::ProgramModel;

/// Database model for clients table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ClientModel {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String, // Unique natural key for search, enroll, update and delete
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    pub emergency_contact: String,
    pub emergency_number: String,
}

/// Database model for prescriptions table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionModel {
    pub id: i64,
    pub client_phone: String,
    pub doctor_id: i64,
    pub medicines: Vec<String>,
    pub date_issued: NaiveDate,
}

/// Prescription row ready for insertion
#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub client_phone: String,
    pub doctor_id: i64,
    pub medicines: Vec<String>,
    pub date_issued: NaiveDate,
}

/// A client together with everything linked to it, read from one snapshot
#[derive(Debug, Clone)]
pub struct ClientRecord {
    pub client: ClientModel,
    pub programs: Vec<ProgramModel>,
    pub prescriptions: Vec<PrescriptionModel>,
}
