//! Chat handler
//!
//! Accepts either a multipart form with an `audio` file part (an optional
//! `message` part is ignored when audio is present) or a JSON body
//! `{"message": "..."}`.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
};
use domain::ChatResponse;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

/// Field carrying the typed message
pub const MESSAGE_FIELD: &str = "message";

/// JSON chat request body
#[derive(Debug, Deserialize)]
pub struct ChatMessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Chat response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant reply
    pub text_response: String,
    /// URL of the spoken reply
    pub audio_response: Option<String>,
    /// Transcript of the user's recording
    pub transcribed_text: Option<String>,
    /// Detected sentiment of the user's message
    pub sentiment: Option<String>,
}

impl From<ChatResponse> for ChatReply {
    fn from(response: ChatResponse) -> Self {
        Self {
            text_response: response.reply_text,
            audio_response: response.audio_url,
            transcribed_text: response.transcribed_text,
            sentiment: response.sentiment.map(|s| s.as_str().to_string()),
        }
    }
}

/// Raw chat inputs before validation
#[derive(Debug, Default)]
struct ChatInputs {
    message: Option<String>,
    audio: Option<Vec<u8>>,
}

/// Handle a chat turn
///
/// The cancellation token is cancelled when this future is dropped, so a
/// client that disconnects stops transcription polling.
#[instrument(skip_all)]
pub async fn chat(State(state): State<AppState>, request: Request) -> Result<Json<ChatReply>, ApiError> {
    let inputs = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        read_multipart(multipart).await?
    } else {
        let Json(body) = Json::<ChatMessageBody>::from_request(request, &state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        ChatInputs {
            message: body.message,
            audio: None,
        }
    };

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let response = state
        .orchestrator
        .handle_chat(inputs.message, inputs.audio, cancel)
        .await?;

    Ok(Json(response.into()))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("multipart/form-data"))
}

async fn read_multipart(mut multipart: Multipart) -> Result<ChatInputs, ApiError> {
    let mut inputs = ChatInputs::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(AUDIO_FIELD) => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                debug!(audio_bytes = bytes.len(), "Received audio part");
                inputs.audio = Some(bytes.to_vec());
            },
            Some(MESSAGE_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                inputs.message = Some(text);
            },
            other => debug!(field = ?other, "Ignoring unknown multipart field"),
        }
    }

    Ok(inputs)
}
