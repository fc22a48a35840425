//! Audio artifact retrieval

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Serve a synthesized reply as `audio/wav`
#[instrument(skip(state))]
pub async fn get_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.orchestrator.read_artifact(&filename).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        bytes,
    ))
}
