use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    service::ProgramService,
    types::{ProgramRegistration, ProgramResponse},
};
use crate::shared::{AppError, AppState, JsonBody, MessageResponse};

/// HTTP handler for registering a program
///
/// POST /programs/register
#[instrument(name = "register_program", skip(state, request))]
pub async fn register_program(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ProgramRegistration>,
) -> Result<Json<MessageResponse>, AppError> {
    info!(name = %request.name, "Registering program");

    let service = ProgramService::new(Arc::clone(&state.program_repository));
    service.register_program(request).await.map_err(|e| {
        warn!(error = %e, "Failed to register program");
        e
    })?;

    Ok(Json(MessageResponse::new("Program registered successfully")))
}

/// HTTP handler for listing all programs
///
/// GET /programs/all
#[instrument(name = "list_programs", skip(state))]
pub async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProgramResponse>>, AppError> {
    let service = ProgramService::new(Arc::clone(&state.program_repository));
    let programs = service.list_programs().await?;

    info!(program_count = programs.len(), "Programs listed successfully");

    Ok(Json(programs))
}
