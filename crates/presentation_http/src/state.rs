//! Application state shared across handlers

use std::sync::Arc;

use application::SessionOrchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Drives chat turns and owns the session's audio artifacts
    pub orchestrator: Arc<SessionOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<SessionOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("active_artifacts", &self.orchestrator.active_artifacts().len())
            .finish_non_exhaustive()
    }
}
