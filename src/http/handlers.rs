use super::state::AppState;
use crate::error::EngineError;
use crate::evaluator;
use crate::history::HistorySummary;
use crate::models::{
    CommonError, PracticeText, ProgressSnapshot, SessionId, SessionReport, SessionSummary, TextId,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Used when a generation request carries no prompt
pub const DEFAULT_PROMPT: &str = "Give me a general typing practice text";

/// Minimum occurrences requested per word in practice prompts
const PRACTICE_REPETITIONS: usize = 10;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GenerateTextRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub text_id: TextId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub text_id: TextId,
    pub content: String,
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckTypingRequest {
    pub text_id: TextId,
    pub current_input: String,

    /// Session start as Unix milliseconds; elapsed time is measured from it
    #[serde(default)]
    pub start_time: Option<i64>,

    /// Explicit elapsed time, takes precedence over `start_time`
    #[serde(default)]
    pub elapsed_seconds: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResultResponse {
    pub success: bool,
    pub session_id: SessionId,
}

#[derive(Debug, Deserialize)]
pub struct GeneratePracticeRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub sessions: Vec<SessionSummary>,
    pub common_errors: Vec<CommonError>,
    pub summary: HistorySummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            EngineError::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /generate-text
/// Generate a practice text from a free-form prompt and store it
pub async fn generate_text(
    State(state): State<AppState>,
    Json(req): Json<GenerateTextRequest>,
) -> Result<Json<PracticeText>, EngineError> {
    let prompt = req
        .prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    info!("Generating text for a prompt of {} characters", prompt.len());
    let content = state.generator.generate_text(&prompt).await?;

    let text = store_text(&state, &content, &prompt)?;
    info!("Stored text {} ({} characters)", text.id, text.content.len());
    Ok(Json(text))
}

/// POST /start-session
/// Fetch the stored text a session will be typed against
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, EngineError> {
    let text = load_text(&state, req.text_id)?;

    Ok(Json(StartSessionResponse {
        text_id: text.id,
        content: text.content,
        prompt: text.source_prompt,
    }))
}

/// POST /check-typing
/// Live progress of the current input against the stored text
pub async fn check_typing(
    State(state): State<AppState>,
    Json(req): Json<CheckTypingRequest>,
) -> Result<Json<ProgressSnapshot>, EngineError> {
    let elapsed_secs = match (req.elapsed_seconds, req.start_time) {
        (Some(elapsed), _) => elapsed,
        (None, Some(start_ms)) => {
            Utc::now().timestamp_millis().saturating_sub(start_ms) as f64 / 1000.0
        }
        (None, None) => {
            return Err(EngineError::invalid(
                "either start_time or elapsed_seconds is required",
            ))
        }
    };

    let text = load_text(&state, req.text_id)?;
    let snapshot = evaluator::check_progress(&text.content, &req.current_input, elapsed_secs);
    debug!(
        "text {}: position {}/{} with {} errors",
        text.id, snapshot.position, snapshot.total_length, snapshot.error_count
    );
    Ok(Json(snapshot))
}

/// POST /submit-result
/// Finalize a client-reported session and store it with its mismatches
pub async fn submit_result(
    State(state): State<AppState>,
    Json(report): Json<SessionReport>,
) -> Result<Json<SubmitResultResponse>, EngineError> {
    let result = evaluator::finalize(report)?;

    let store = state.store();
    if store.get_text(result.text_id)?.is_none() {
        return Err(EngineError::NotFound(result.text_id));
    }
    let session_id = store.save_result(&result)?;
    info!(
        "Saved session {} for text {}: {:.1} wpm, {:.1}% accuracy",
        session_id, result.text_id, result.wpm, result.accuracy
    );

    Ok(Json(SubmitResultResponse {
        success: true,
        session_id,
    }))
}

/// POST /generate-practice
/// Generate repetition practice for the given words
pub async fn generate_practice(
    State(state): State<AppState>,
    Json(req): Json<GeneratePracticeRequest>,
) -> Result<Json<PracticeText>, EngineError> {
    let words: Vec<String> = req
        .words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect();
    if words.is_empty() {
        return Err(EngineError::invalid("No words provided"));
    }

    let word_list = words.iter().join(", ");
    let prompt = format!(
        "Create a typing practice paragraph that includes EACH of these words \
         AT LEAST {} TIMES: {}. \
         Make sure each word appears multiple times throughout the text. \
         The text should be coherent but focus on repeating these words frequently for practice.",
        PRACTICE_REPETITIONS, word_list
    );
    info!("Generating practice for {} words", words.len());

    let content = state.generator.generate_text(&prompt).await?;

    let lowered = content.to_lowercase();
    for word in &words {
        let count = lowered.matches(&word.to_lowercase()).count();
        debug!("Word '{}' appears {} times in generated text", word, count);
    }

    let text = store_text(&state, &content, &format!("Practice: {}", word_list))?;
    Ok(Json(text))
}

/// GET /history
/// Recent sessions, most common mismatches, and aggregate figures
pub async fn history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, EngineError> {
    let store = state.store();
    let sessions = store.recent_sessions(state.history_limit)?;
    let common_errors = store.common_errors(state.history_limit)?;
    let summary = HistorySummary::from_sessions(&sessions);

    Ok(Json(HistoryResponse {
        sessions,
        common_errors,
        summary,
    }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn load_text(state: &AppState, text_id: TextId) -> Result<PracticeText, EngineError> {
    if text_id <= 0 {
        return Err(EngineError::invalid(format!("Invalid text ID {}", text_id)));
    }
    state
        .store()
        .get_text(text_id)?
        .ok_or(EngineError::NotFound(text_id))
}

fn store_text(state: &AppState, content: &str, prompt: &str) -> Result<PracticeText, EngineError> {
    let store = state.store();
    let id = store.save_text(content, prompt)?;
    store.get_text(id)?.ok_or(EngineError::NotFound(id))
}
