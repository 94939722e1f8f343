use axum::Router;
use std::sync::Arc;

use clinic::{
    build_router, client::repository::ClientRepository, AppState, TokenConfig,
};

pub const TEST_SECRET: &str = "integration-test-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestAppBuilder {
    client_repository: Option<Arc<dyn ClientRepository + Send + Sync>>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            client_repository: None,
        }
    }

    /// Swap in a custom client repository, e.g. one that always fails
    pub fn with_client_repository(
        mut self,
        repo: Arc<dyn ClientRepository + Send + Sync>,
    ) -> Self {
        self.client_repository = Some(repo);
        self
    }

    pub fn build(self) -> TestApp {
        let mut state = AppState::in_memory(TokenConfig::new(TEST_SECRET));
        if let Some(repo) = self.client_repository {
            state.client_repository = repo;
        }

        TestApp {
            router: build_router(state.clone()),
            state,
        }
    }
}
