use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::TokenConfig;
use crate::client::repository::{
    ClientRepository, InMemoryClientRepository, PostgresClientRepository,
};
use crate::doctor::repository::{
    DoctorRepository, InMemoryDoctorRepository, PostgresDoctorRepository,
};
use crate::program::repository::{
    InMemoryProgramRepository, PostgresProgramRepository, ProgramRepository,
};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub client_repository: Arc<dyn ClientRepository + Send + Sync>,
    pub doctor_repository: Arc<dyn DoctorRepository + Send + Sync>,
    pub program_repository: Arc<dyn ProgramRepository + Send + Sync>,
    pub token_config: TokenConfig,
}

impl AppState {
    pub fn new(
        client_repository: Arc<dyn ClientRepository + Send + Sync>,
        doctor_repository: Arc<dyn DoctorRepository + Send + Sync>,
        program_repository: Arc<dyn ProgramRepository + Send + Sync>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            client_repository,
            doctor_repository,
            program_repository,
            token_config,
        }
    }

    /// State backed by PostgreSQL, all repositories sharing one pool
    pub fn postgres(pool: PgPool, token_config: TokenConfig) -> Self {
        Self::new(
            Arc::new(PostgresClientRepository::new(pool.clone())),
            Arc::new(PostgresDoctorRepository::new(pool.clone())),
            Arc::new(PostgresProgramRepository::new(pool)),
            token_config,
        )
    }

    /// State backed by in-memory repositories, used by the test suites
    pub fn in_memory(token_config: TokenConfig) -> Self {
        let programs = Arc::new(InMemoryProgramRepository::new());
        Self::new(
            Arc::new(InMemoryClientRepository::new(programs.clone())),
            Arc::new(InMemoryDoctorRepository::new()),
            programs,
            token_config,
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict("Record already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::NotFound("Referenced record does not exist".to_string());
            }
        }
        AppError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::JwtError(msg) => {
                error!(error = %msg, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate token".to_string(),
                )
            }
            AppError::PasswordHash(msg) | AppError::DatabaseError(msg) => {
                error!(error = %msg, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Confirmation body returned by mutating endpoints
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON extractor that rejects unreadable bodies with a 400 `AppError`
/// instead of axum's default 415/422 responses.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "Rejected request payload");
                Err(AppError::Validation("Invalid request payload".to_string()))
            }
        }
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}


#[cfg(test)]
mod tests {
    use super::*;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors_map_to_bad_request() {
        let (status, body) = response_parts(AppError::Conflict("Client already exists".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Client already exists");

        let (status, _) = response_parts(AppError::NotFound("Client not found".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = response_parts(AppError::Validation("bad".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_401() {
        let (status, body) = response_parts(AppError::Unauthorized("Invalid token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let (status, body) =
            response_parts(AppError::DatabaseError("relation clients does not exist".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(!is_blank("x"));
    }
}
