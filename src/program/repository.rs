use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{models::ProgramModel, types::ProgramRegistration};
use crate::shared::AppError;

/// Trait for program repository operations
#[async_trait]
pub trait ProgramRepository {
    async fn create_program(&self, program: &ProgramRegistration)
        -> Result<ProgramModel, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<ProgramModel>, AppError>;
    /// All programs in insertion (id) order
    async fn list_programs(&self) -> Result<Vec<ProgramModel>, AppError>;
}

/// In-memory implementation of ProgramRepository used as the test double
pub struct InMemoryProgramRepository {
    programs: RwLock<Vec<ProgramModel>>,
}

impl Default for InMemoryProgramRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProgramRepository {
    pub fn new() -> Self {
        Self {
            programs: RwLock::new(Vec::new()),
        }
    }

    /// Programs whose ids appear in `ids`, in id order
    pub(crate) async fn programs_by_ids(&self, ids: &[i64]) -> Vec<ProgramModel> {
        self.programs
            .read()
            .await
            .iter()
            .filter(|program| ids.contains(&program.id))
            .cloned()
            .collect()
    }

    pub async fn program_count(&self) -> usize {
        self.programs.read().await.len()
    }
}

#[async_trait]
impl ProgramRepository for InMemoryProgramRepository {
    #[instrument(skip(self, program), fields(name = %program.name))]
    async fn create_program(
        &self,
        program: &ProgramRegistration,
    ) -> Result<ProgramModel, AppError> {
        let mut programs = self.programs.write().await;
        if programs.iter().any(|p| p.name == program.name) {
            warn!("Program already exists in memory");
            return Err(AppError::Conflict("Program already exists".to_string()));
        }

        let model = ProgramModel {
            id: programs.last().map_or(1, |p| p.id + 1),
            name: program.name.clone(),
            symptoms: program.symptoms.clone(),
            severity: program.severity,
        };
        programs.push(model.clone());

        debug!(program_id = model.id, "Program created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<ProgramModel>, AppError> {
        let programs = self.programs.read().await;
        Ok(programs.iter().find(|p| p.name == name).cloned())
    }

    #[instrument(skip(self))]
    async fn list_programs(&self) -> Result<Vec<ProgramModel>, AppError> {
        Ok(self.programs.read().await.clone())
    }
}

/// PostgreSQL implementation of program repository
pub struct PostgresProgramRepository {
    pool: PgPool,
}

impl PostgresProgramRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramRepository for PostgresProgramRepository {
    #[instrument(skip(self, program), fields(name = %program.name))]
    async fn create_program(
        &self,
        program: &ProgramRegistration,
    ) -> Result<ProgramModel, AppError> {
        let model = sqlx::query_as::<_, ProgramModel>(
            "INSERT INTO programs (name, symptoms, severity) VALUES ($1, $2, $3) \
             RETURNING id, name, symptoms, severity",
        )
        .bind(&program.name)
        .bind(&program.symptoms)
        .bind(program.severity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to save program in database");
            match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict("Program already exists".to_string()),
                other => other,
            }
        })?;

        debug!(program_id = model.id, "Program created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<ProgramModel>, AppError> {
        sqlx::query_as::<_, ProgramModel>(
            "SELECT id, name, symptoms, severity FROM programs WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to query program by name");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn list_programs(&self) -> Result<Vec<ProgramModel>, AppError> {
        sqlx::query_as::<_, ProgramModel>(
            "SELECT id, name, symptoms, severity FROM programs ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to retrieve programs");
            AppError::from(e)
        })
    }
}
