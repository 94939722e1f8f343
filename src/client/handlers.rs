use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{ClientModel, PrescriptionModel},
    service::ClientService,
    types::{
        ClientDetails, ClientRegistration, CreatePrescriptionRequest, EnrollRequest,
        PhoneNumberRequest, UpdatePrescriptionRequest,
    },
};
use crate::auth::DoctorClaims;
use crate::shared::{AppError, AppState, JsonBody, MessageResponse};

fn service(state: &AppState) -> ClientService {
    ClientService::new(
        Arc::clone(&state.client_repository),
        Arc::clone(&state.doctor_repository),
    )
}

/// HTTP handler for registering a client
///
/// POST /clients/register
#[instrument(name = "register_client", skip(state, request))]
pub async fn register_client(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ClientRegistration>,
) -> Result<Json<MessageResponse>, AppError> {
    info!(phonenumber = %request.phonenumber, "Registering client");

    service(&state).register_client(request).await.map_err(|e| {
        warn!(error = %e, "Failed to register client");
        e
    })?;

    Ok(Json(MessageResponse::new("Client registered successfully")))
}

/// HTTP handler for looking up a client by phone number
///
/// POST /clients/search
/// Returns the client with its enrolled programs and prescriptions
#[instrument(name = "search_client", skip(state, request))]
pub async fn search_client(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PhoneNumberRequest>,
) -> Result<Json<ClientDetails>, AppError> {
    let details = service(&state).search_client(request).await?;

    info!(
        client_id = details.client.id,
        program_count = details.programs.len(),
        prescription_count = details.prescriptions.len(),
        "Client found"
    );

    Ok(Json(details))
}

/// POST /clients/program-enroll
#[instrument(name = "enroll_client", skip(state, claims, request), fields(doctor = %claims.email))]
pub async fn enroll_client(
    State(state): State<AppState>,
    Extension(claims): Extension<DoctorClaims>,
    JsonBody(request): JsonBody<EnrollRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state).enroll_client(request).await.map_err(|e| {
        warn!(error = %e, "Failed to enroll client");
        e
    })?;

    Ok(Json(MessageResponse::new("Client enrolled successfully")))
}

/// GET /clients/clients
#[instrument(name = "list_clients", skip(state, claims), fields(doctor = %claims.email))]
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(claims): Extension<DoctorClaims>,
) -> Result<Json<Vec<ClientModel>>, AppError> {
    let clients = service(&state).list_clients().await?;

    info!(client_count = clients.len(), "Clients listed successfully");

    Ok(Json(clients))
}

/// PUT /clients/update
#[instrument(name = "update_client", skip(state, claims, request), fields(doctor = %claims.email))]
pub async fn update_client(
    State(state): State<AppState>,
    Extension(claims): Extension<DoctorClaims>,
    JsonBody(request): JsonBody<ClientRegistration>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state).update_client(request).await.map_err(|e| {
        warn!(error = %e, "Failed to update client");
        e
    })?;

    Ok(Json(MessageResponse::new("Client updated successfully")))
}

/// DELETE /clients/delete
#[instrument(name = "delete_client", skip(state, claims, request), fields(doctor = %claims.email))]
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(claims): Extension<DoctorClaims>,
    JsonBody(request): JsonBody<PhoneNumberRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    info!(phonenumber = %request.phonenumber, "Deleting client");

    service(&state).delete_client(request).await.map_err(|e| {
        warn!(error = %e, "Failed to delete client");
        e
    })?;

    Ok(Json(MessageResponse::new("Client deleted successfully")))
}

/// POST /clients/prescription
#[instrument(name = "create_prescription", skip(state, claims, request), fields(doctor = %claims.email))]
pub async fn create_prescription(
    State(state): State<AppState>,
    Extension(claims): Extension<DoctorClaims>,
    JsonBody(request): JsonBody<CreatePrescriptionRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let prescription = service(&state)
        .create_prescription(request)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create prescription");
            e
        })?;

    info!(prescription_id = prescription.id, "Prescription issued");
    Ok(Json(MessageResponse::new("Prescription created successfully")))
}

/// PUT /clients/prescription
#[instrument(name = "update_prescription", skip(state, claims, request), fields(doctor = %claims.email))]
pub async fn update_prescription(
    State(state): State<AppState>,
    Extension(claims): Extension<DoctorClaims>,
    JsonBody(request): JsonBody<UpdatePrescriptionRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state)
        .update_prescription(request)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update prescription");
            e
        })?;

    Ok(Json(MessageResponse::new("Prescription updated successfully")))
}

/// POST /clients/prescriptions
#[instrument(name = "list_prescriptions", skip(state, claims, request), fields(doctor = %claims.email))]
pub async fn list_prescriptions(
    State(state): State<AppState>,
    Extension(claims): Extension<DoctorClaims>,
    JsonBody(request): JsonBody<PhoneNumberRequest>,
) -> Result<Json<Vec<PrescriptionModel>>, AppError> {
    let prescriptions = service(&state).prescriptions_for_client(request).await?;
    Ok(Json(prescriptions))
}
