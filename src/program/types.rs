use serde::{Deserialize, Serialize};

use super::models::ProgramModel;
use crate::shared::{is_blank, AppError};

/// Request payload for registering a program
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProgramRegistration {
    pub name: String,
    pub symptoms: String,
    pub severity: i32,
}

impl ProgramRegistration {
    pub fn validate(&self) -> Result<(), AppError> {
        if is_blank(&self.name) || is_blank(&self.symptoms) || self.severity == 0 {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        Ok(())
    }
}

/// Program as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramResponse {
    pub name: String,
    pub symptoms: String,
    pub severity: i32,
}

impl From<ProgramModel> for ProgramResponse {
    fn from(model: ProgramModel) -> Self {
        Self {
            name: model.name,
            symptoms: model.symptoms,
            severity: model.severity,
        }
    }
}
