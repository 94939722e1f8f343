use async_trait::async_trait;
use chrono::NaiveDate;

use clinic::{
    client::{
        models::{ClientModel, ClientRecord, NewPrescription, PrescriptionModel},
        repository::ClientRepository,
        types::ClientRegistration,
    },
    AppError,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Client repository whose storage is always unreachable
pub struct FailingClientRepository;

fn unavailable<T>() -> Result<T, AppError> {
    Err(AppError::DatabaseError(
        "connection refused: clients table unavailable".to_string(),
    ))
}

#[async_trait]
impl ClientRepository for FailingClientRepository {
    async fn create_client(&self, _client: &ClientRegistration) -> Result<ClientModel, AppError> {
        unavailable()
    }

    async fn find_client(&self, _phonenumber: &str) -> Result<Option<ClientModel>, AppError> {
        unavailable()
    }

    async fn client_record(&self, _phonenumber: &str) -> Result<Option<ClientRecord>, AppError> {
        unavailable()
    }

    async fn list_clients(&self) -> Result<Vec<ClientModel>, AppError> {
        unavailable()
    }

    async fn update_client(&self, _client: &ClientRegistration) -> Result<(), AppError> {
        unavailable()
    }

    async fn delete_client(&self, _phonenumber: &str) -> Result<(), AppError> {
        unavailable()
    }

    async fn enroll_client(&self, _phonenumber: &str, _program_name: &str) -> Result<(), AppError> {
        unavailable()
    }

    async fn create_prescription(
        &self,
        _prescription: &NewPrescription,
    ) -> Result<PrescriptionModel, AppError> {
        unavailable()
    }

    async fn update_prescription(
        &self,
        _id: i64,
        _medicines: &[String],
        _date_issued: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        unavailable()
    }

    async fn prescriptions_for_client(
        &self,
        _phonenumber: &str,
    ) -> Result<Vec<PrescriptionModel>, AppError> {
        unavailable()
    }
}
