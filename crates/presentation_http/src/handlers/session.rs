//! Session teardown

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Filenames removed by ending the session
#[derive(Debug, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub deleted: Vec<String>,
}

/// Delete every artifact of the session
///
/// Idempotent: a second call answers with an empty list.
#[instrument(skip(state))]
pub async fn end_session(State(state): State<AppState>) -> Result<Json<EndSessionResponse>, ApiError> {
    let deleted = state.orchestrator.end_session().await?;
    Ok(Json(EndSessionResponse { deleted }))
}
