use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    service::DoctorService,
    types::{DoctorRegistration, LoginRequest, LoginResponse},
};
use crate::shared::{AppError, AppState, JsonBody, MessageResponse};

/// HTTP handler for registering a doctor
///
/// POST /doctors/register
#[instrument(name = "register_doctor", skip(state, request))]
pub async fn register_doctor(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DoctorRegistration>,
) -> Result<Json<MessageResponse>, AppError> {
    info!(email = %request.email, "Registering doctor");

    let service = DoctorService::new(
        Arc::clone(&state.doctor_repository),
        state.token_config.clone(),
    );
    service.register_doctor(request).await.map_err(|e| {
        warn!(error = %e, "Failed to register doctor");
        e
    })?;

    Ok(Json(MessageResponse::new("Doctor registered successfully")))
}

/// HTTP handler for doctor login
///
/// POST /doctors/login
/// Returns a bearer token valid for 24 hours
#[instrument(name = "login_doctor", skip(state, request))]
pub async fn login_doctor(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = DoctorService::new(
        Arc::clone(&state.doctor_repository),
        state.token_config.clone(),
    );
    let response = service.login(request).await.map_err(|e| {
        warn!(error = %e, "Failed to login doctor");
        e
    })?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctor::repository::InMemoryDoctorRepository;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    const DOCTOR: &str = r#"{
        "firstname": "John",
        "lastname": "Doe",
        "email": "john.doe@example.com",
        "phonenumber": "1234567890",
        "department": "Cardiology",
        "password": "password123"
    }"#;

    fn app(repo: Arc<InMemoryDoctorRepository>) -> Router {
        let state = AppStateBuilder::new().with_doctor_repository(repo).build();
        Router::new()
            .route("/register", post(register_doctor))
            .route("/login", post(login_doctor))
            .with_state(state)
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_register_doctor_handler() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        let response = app(repo.clone())
            .oneshot(post_json("/register", DOCTOR.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Doctor registered successfully"
        );
        assert_eq!(repo.doctor_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_doctor_missing_department() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        let body = json!({
            "firstname": "John",
            "lastname": "Doe",
            "email": "john.doe@example.com",
            "phonenumber": "1234567890",
            "password": "password123"
        });
        let response = app(repo.clone())
            .oneshot(post_json("/register", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "All fields are required");
        assert_eq!(repo.doctor_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_doctor_handler() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        let app = app(repo);
        app.clone()
            .oneshot(post_json("/register", DOCTOR.to_string()))
            .await
            .unwrap();

        let login = json!({"email": "john.doe@example.com", "password": "password123"});
        let response = app
            .oneshot(post_json("/login", login.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let login_response: LoginResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(login_response.message, "Doctor logged in successfully");
        assert!(!login_response.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password_has_no_token() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        let app = app(repo);
        app.clone()
            .oneshot(post_json("/register", DOCTOR.to_string()))
            .await
            .unwrap();

        let login = json!({"email": "john.doe@example.com", "password": "nope"});
        let response = app
            .oneshot(post_json("/login", login.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid email or password");
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn test_login_missing_password() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        let login = json!({"email": "john.doe@example.com"});
        let response = app(repo)
            .oneshot(post_json("/login", login.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
