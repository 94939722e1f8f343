use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::models::{ClientModel, ClientRecord, PrescriptionModel};
use crate::program::types::ProgramResponse;
use crate::shared::{is_blank, AppError};

/// Request payload for registering or updating a client
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ClientRegistration {
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    pub emergency_contact: String,
    pub emergency_number: String,
}

impl ClientRegistration {
    pub fn validate(&self) -> Result<(), AppError> {
        if is_blank(&self.firstname)
            || is_blank(&self.lastname)
            || is_blank(&self.phonenumber)
            || self.age == 0
            || self.height == 0.0
            || self.weight == 0.0
        {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        if is_blank(&self.emergency_contact) || is_blank(&self.emergency_number) {
            return Err(AppError::Validation(
                "Emergency contact and number are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request payload for endpoints keyed by phone number
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PhoneNumberRequest {
    pub phonenumber: String,
}

impl PhoneNumberRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if is_blank(&self.phonenumber) {
            return Err(AppError::Validation("Phone number is required".to_string()));
        }
        Ok(())
    }
}

/// Request payload for enrolling a client in a program
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrollRequest {
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "programName")]
    pub program_name: String,
}

impl EnrollRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if is_blank(&self.phone_number) || is_blank(&self.program_name) {
            return Err(AppError::Validation(
                "PhoneNumber and ProgramName are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request payload for issuing a prescription.
/// `date_issued` defaults to today when omitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreatePrescriptionRequest {
    pub client_phone: String,
    pub doctor_id: i64,
    pub medicines: Vec<String>,
    pub date_issued: Option<NaiveDate>,
}

impl CreatePrescriptionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if is_blank(&self.client_phone) || self.doctor_id <= 0 {
            return Err(AppError::Validation(
                "Client phone and doctor id are required".to_string(),
            ));
        }
        validate_medicines(&self.medicines)
    }
}

/// Request payload for amending a prescription.
/// A missing `date_issued` keeps the stored date.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpdatePrescriptionRequest {
    pub id: i64,
    pub medicines: Vec<String>,
    pub date_issued: Option<NaiveDate>,
}

impl UpdatePrescriptionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id <= 0 {
            return Err(AppError::Validation("Prescription id is required".to_string()));
        }
        validate_medicines(&self.medicines)
    }
}

fn validate_medicines(medicines: &[String]) -> Result<(), AppError> {
    if medicines.is_empty() || medicines.iter().any(|m| is_blank(m)) {
        return Err(AppError::Validation(
            "At least one medicine is required".to_string(),
        ));
    }
    Ok(())
}

/// Search response: the client's fields plus enrolled programs and prescriptions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientDetails {
    #[serde(flatten)]
    pub client: ClientModel,
    pub programs: Vec<ProgramResponse>,
    pub prescriptions: Vec<PrescriptionModel>,
}

impl From<ClientRecord> for ClientDetails {
    fn from(record: ClientRecord) -> Self {
        Self {
            client: record.client,
            programs: record
                .programs
                .into_iter()
                .map(ProgramResponse::from)
                .collect(),
            prescriptions: record.prescriptions,
        }
    }
}
