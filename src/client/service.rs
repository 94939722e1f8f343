use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{ClientModel, NewPrescription, PrescriptionModel},
    repository::ClientRepository,
    types::{
        ClientDetails, ClientRegistration, CreatePrescriptionRequest, EnrollRequest,
        PhoneNumberRequest, UpdatePrescriptionRequest,
    },
};
use crate::doctor::repository::DoctorRepository;
use crate::shared::AppError;

/// Service for client records, enrollments and prescriptions
pub struct ClientService {
    repository: Arc<dyn ClientRepository + Send + Sync>,
    doctors: Arc<dyn DoctorRepository + Send + Sync>,
}

impl ClientService {
    pub fn new(
        repository: Arc<dyn ClientRepository + Send + Sync>,
        doctors: Arc<dyn DoctorRepository + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            doctors,
        }
    }

    #[instrument(skip(self, request), fields(phonenumber = %request.phonenumber))]
    pub async fn register_client(&self, request: ClientRegistration) -> Result<(), AppError> {
        request.validate()?;

        if self
            .repository
            .find_client(&request.phonenumber)
            .await?
            .is_some()
        {
            warn!("Client with this phone number already registered");
            return Err(AppError::Conflict("Client already exists".to_string()));
        }

        let client = self.repository.create_client(&request).await?;

        info!(client_id = client.id, "Client registered");
        Ok(())
    }

    /// Looks up a client with its programs and prescriptions
    #[instrument(skip(self, request), fields(phonenumber = %request.phonenumber))]
    pub async fn search_client(
        &self,
        request: PhoneNumberRequest,
    ) -> Result<ClientDetails, AppError> {
        request.validate()?;

        let record = self
            .repository
            .client_record(&request.phonenumber)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

        Ok(ClientDetails::from(record))
    }

    #[instrument(skip(self))]
    pub async fn list_clients(&self) -> Result<Vec<ClientModel>, AppError> {
        self.repository.list_clients().await
    }

    #[instrument(skip(self, request), fields(phonenumber = %request.phonenumber))]
    pub async fn update_client(&self, request: ClientRegistration) -> Result<(), AppError> {
        request.validate()?;
        self.repository.update_client(&request).await?;

        info!("Client updated");
        Ok(())
    }

    #[instrument(skip(self, request), fields(phonenumber = %request.phonenumber))]
    pub async fn delete_client(&self, request: PhoneNumberRequest) -> Result<(), AppError> {
        request.validate()?;
        self.repository.delete_client(&request.phonenumber).await?;

        info!("Client deleted");
        Ok(())
    }

    #[instrument(skip(self, request), fields(phonenumber = %request.phone_number, program = %request.program_name))]
    pub async fn enroll_client(&self, request: EnrollRequest) -> Result<(), AppError> {
        request.validate()?;
        self.repository
            .enroll_client(&request.phone_number, &request.program_name)
            .await?;

        info!("Client enrolled");
        Ok(())
    }

    /// Issues a prescription, dated today unless the request names a date
    #[instrument(skip(self, request), fields(client_phone = %request.client_phone))]
    pub async fn create_prescription(
        &self,
        request: CreatePrescriptionRequest,
    ) -> Result<PrescriptionModel, AppError> {
        request.validate()?;

        if self
            .repository
            .find_client(&request.client_phone)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Client not found".to_string()));
        }
        if self.doctors.find_by_id(request.doctor_id).await?.is_none() {
            warn!(doctor_id = request.doctor_id, "Prescription names an unknown doctor");
            return Err(AppError::NotFound("Doctor not found".to_string()));
        }

        let prescription = self
            .repository
            .create_prescription(&NewPrescription {
                client_phone: request.client_phone,
                doctor_id: request.doctor_id,
                medicines: request.medicines,
                date_issued: request
                    .date_issued
                    .unwrap_or_else(|| Utc::now().date_naive()),
            })
            .await?;

        info!(prescription_id = prescription.id, "Prescription created");
        Ok(prescription)
    }

    #[instrument(skip(self, request), fields(prescription_id = request.id))]
    pub async fn update_prescription(
        &self,
        request: UpdatePrescriptionRequest,
    ) -> Result<(), AppError> {
        request.validate()?;
        self.repository
            .update_prescription(request.id, &request.medicines, request.date_issued)
            .await?;

        info!("Prescription updated");
        Ok(())
    }

    #[instrument(skip(self, request), fields(phonenumber = %request.phonenumber))]
    pub async fn prescriptions_for_client(
        &self,
        request: PhoneNumberRequest,
    ) -> Result<Vec<PrescriptionModel>, AppError> {
        request.validate()?;

        if self
            .repository
            .find_client(&request.phonenumber)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Client not found".to_string()));
        }

        self.repository
            .prescriptions_for_client(&request.phonenumber)
            .await
    }
}
