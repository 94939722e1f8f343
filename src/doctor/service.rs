use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::NewDoctor,
    repository::DoctorRepository,
    types::{DoctorRegistration, LoginRequest, LoginResponse},
};
use crate::auth::{hash_password, verify_password, TokenConfig};
use crate::shared::AppError;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Service for doctor registration and login
pub struct DoctorService {
    repository: Arc<dyn DoctorRepository + Send + Sync>,
    token_config: TokenConfig,
}

impl DoctorService {
    pub fn new(
        repository: Arc<dyn DoctorRepository + Send + Sync>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            repository,
            token_config,
        }
    }

    /// Registers a doctor, storing only the password hash
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register_doctor(&self, request: DoctorRegistration) -> Result<(), AppError> {
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let doctor = self
            .repository
            .create_doctor(&NewDoctor {
                firstname: request.firstname,
                lastname: request.lastname,
                email: request.email,
                phonenumber: request.phonenumber,
                department: request.department,
                password_hash,
            })
            .await?;

        info!(doctor_id = doctor.id, "Doctor registered");
        Ok(())
    }

    /// Verifies credentials and issues a bearer token.
    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let doctor = match self.repository.find_by_email(&request.email).await? {
            Some(doctor) => doctor,
            None => {
                warn!("Login attempted for unknown email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(&doctor.password_hash, &request.password) {
            warn!(doctor_id = doctor.id, "Login attempted with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.token_config.issue_token(&doctor.email)?;

        info!(doctor_id = doctor.id, "Doctor logged in");
        Ok(LoginResponse {
            message: "Doctor logged in successfully".to_string(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctor::repository::InMemoryDoctorRepository;

    fn registration() -> DoctorRegistration {
        DoctorRegistration {
            firstname: "John".to_string(),
            lastname: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phonenumber: "1234567890".to_string(),
            department: "Cardiology".to_string(),
            password: "password123".to_string(),
        }
    }

    fn login(password: &str) -> LoginRequest {
        LoginRequest {
            email: "john.doe@example.com".to_string(),
            password: password.to_string(),
        }
    }

    fn service(repo: Arc<InMemoryDoctorRepository>) -> DoctorService {
        DoctorService::new(repo, TokenConfig::new("test-secret"))
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        service(repo.clone())
            .register_doctor(registration())
            .await
            .unwrap();

        let stored = repo
            .find_by_email("john.doe@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "password123");
        assert!(verify_password(&stored.password_hash, "password123"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        let service = service(repo);
        service.register_doctor(registration()).await.unwrap();

        let result = service.register_doctor(registration()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_issues_valid_token() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        let service = service(repo);
        service.register_doctor(registration()).await.unwrap();

        let response = service.login(login("password123")).await.unwrap();
        let claims = TokenConfig::new("test-secret")
            .validate_token(&response.token)
            .unwrap();
        assert_eq!(claims.email, "john.doe@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let repo = Arc::new(InMemoryDoctorRepository::new());
        let service = service(repo);
        service.register_doctor(registration()).await.unwrap();

        let result = service.login(login("wrongpassword")).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = service(Arc::new(InMemoryDoctorRepository::new()));

        let result = service.login(login("password123")).await;
        assert!(matches!(result, Err(AppError::Unauthorized(msg)) if msg == INVALID_CREDENTIALS));
    }
}
