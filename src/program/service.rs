use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    repository::ProgramRepository,
    types::{ProgramRegistration, ProgramResponse},
};
use crate::shared::AppError;

/// Service for handling program business logic
pub struct ProgramService {
    repository: Arc<dyn ProgramRepository + Send + Sync>,
}

impl ProgramService {
    pub fn new(repository: Arc<dyn ProgramRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn register_program(&self, request: ProgramRegistration) -> Result<(), AppError> {
        request.validate()?;

        let program = self.repository.create_program(&request).await?;

        info!(program_id = program.id, "Program registered");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_programs(&self) -> Result<Vec<ProgramResponse>, AppError> {
        let programs = self.repository.list_programs().await?;
        Ok(programs.into_iter().map(ProgramResponse::from).collect())
    }
}
