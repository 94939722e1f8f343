use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{DoctorModel, NewDoctor};
use crate::shared::AppError;

/// Trait for doctor repository operations
#[async_trait]
pub trait DoctorRepository {
    async fn create_doctor(&self, doctor: &NewDoctor) -> Result<DoctorModel, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<DoctorModel>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<DoctorModel>, AppError>;
}

/// In-memory implementation of DoctorRepository used as the test double
pub struct InMemoryDoctorRepository {
    doctors: RwLock<Vec<DoctorModel>>,
}

impl Default for InMemoryDoctorRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDoctorRepository {
    pub fn new() -> Self {
        Self {
            doctors: RwLock::new(Vec::new()),
        }
    }

    pub async fn doctor_count(&self) -> usize {
        self.doctors.read().await.len()
    }
}

#[async_trait]
impl DoctorRepository for InMemoryDoctorRepository {
    #[instrument(skip(self, doctor), fields(email = %doctor.email))]
    async fn create_doctor(&self, doctor: &NewDoctor) -> Result<DoctorModel, AppError> {
        let mut doctors = self.doctors.write().await;
        if doctors.iter().any(|d| d.email == doctor.email) {
            warn!("Doctor already exists in memory");
            return Err(AppError::Conflict("Doctor already exists".to_string()));
        }

        let model = DoctorModel {
            id: doctors.last().map_or(1, |d| d.id + 1),
            firstname: doctor.firstname.clone(),
            lastname: doctor.lastname.clone(),
            email: doctor.email.clone(),
            phonenumber: doctor.phonenumber.clone(),
            department: doctor.department.clone(),
            password_hash: doctor.password_hash.clone(),
        };
        doctors.push(model.clone());

        debug!(doctor_id = model.id, "Doctor created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<DoctorModel>, AppError> {
        let doctors = self.doctors.read().await;
        Ok(doctors.iter().find(|d| d.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<DoctorModel>, AppError> {
        let doctors = self.doctors.read().await;
        Ok(doctors.iter().find(|d| d.id == id).cloned())
    }
}

/// PostgreSQL implementation of doctor repository
pub struct PostgresDoctorRepository {
    pool: PgPool,
}

impl PostgresDoctorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for PostgresDoctorRepository {
    #[instrument(skip(self, doctor), fields(email = %doctor.email))]
    async fn create_doctor(&self, doctor: &NewDoctor) -> Result<DoctorModel, AppError> {
        let model = sqlx::query_as::<_, DoctorModel>(
            "INSERT INTO doctors (firstname, lastname, email, phonenumber, department, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, firstname, lastname, email, phonenumber, department, password_hash",
        )
        .bind(&doctor.firstname)
        .bind(&doctor.lastname)
        .bind(&doctor.email)
        .bind(&doctor.phonenumber)
        .bind(&doctor.department)
        .bind(&doctor.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to save doctor in database");
            match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict("Doctor already exists".to_string()),
                other => other,
            }
        })?;

        debug!(doctor_id = model.id, "Doctor created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<DoctorModel>, AppError> {
        sqlx::query_as::<_, DoctorModel>(
            "SELECT id, firstname, lastname, email, phonenumber, department, password_hash \
             FROM doctors WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to query doctor");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<DoctorModel>, AppError> {
        sqlx::query_as::<_, DoctorModel>(
            "SELECT id, firstname, lastname, email, phonenumber, department, password_hash \
             FROM doctors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to query doctor by id");
            AppError::from(e)
        })
    }
}
