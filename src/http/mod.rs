//! JSON API for the typing practice flow
//!
//! - POST /generate-text - Generate and store a practice text
//! - POST /start-session - Fetch a stored text to type against
//! - POST /check-typing - Live progress for the current input
//! - POST /submit-result - Finalize and store a finished session
//! - POST /generate-practice - Repetition practice for mistyped words
//! - GET /history - Recent sessions and most common mismatches
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{
    CheckTypingRequest, ErrorResponse, GeneratePracticeRequest, GenerateTextRequest,
    HistoryResponse, StartSessionRequest, StartSessionResponse, SubmitResultResponse,
    DEFAULT_PROMPT,
};
pub use routes::create_router;
pub use state::AppState;
