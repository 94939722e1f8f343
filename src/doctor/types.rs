use serde::{Deserialize, Serialize};

use crate::shared::{is_blank, AppError};

/// Request payload for registering a doctor
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DoctorRegistration {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phonenumber: String,
    pub department: String,
    pub password: String,
}

impl DoctorRegistration {
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            &self.firstname,
            &self.lastname,
            &self.email,
            &self.phonenumber,
            &self.department,
        ];
        if required.iter().any(|field| is_blank(field)) || self.password.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        Ok(())
    }
}

/// Request payload for doctor login
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if is_blank(&self.email) || self.password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}
