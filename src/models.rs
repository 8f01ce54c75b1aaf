use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TextId = i64;
pub type SessionId = i64;

/// A generated body of practice text, immutable once stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeText {
    pub id: TextId,
    pub content: String,
    pub source_prompt: String,
    pub created_at: DateTime<Utc>,
}

/// Live view of a typing attempt, recomputed on every check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Whether the most recent keystroke matched the reference
    pub correct: bool,
    pub current_wpm: f64,
    pub current_accuracy: f64,
    pub position: usize,
    pub total_length: usize,
    pub error_count: usize,
}

/// A single position where the typed character differs from the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharMismatch {
    pub expected_char: char,
    pub typed_char: char,
    pub position: usize,
}

/// Metrics reported by the client when a session ends.
///
/// The client owns the keystroke timeline, so its wpm and accuracy are taken
/// as the final figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub text_id: TextId,
    pub wpm: f64,
    pub accuracy: f64,
    pub errors: usize,
    #[serde(default)]
    pub error_details: Vec<CharMismatch>,
    #[serde(default)]
    pub error_words: Vec<String>,
}

/// Finalized outcome of a session, ready for persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResult {
    pub text_id: TextId,
    pub wpm: f64,
    pub accuracy: f64,
    pub error_count: usize,
    pub mismatches: Vec<CharMismatch>,
}

/// A stored session joined with the prompt of the text it was typed against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub text_id: TextId,
    pub wpm: f64,
    pub accuracy: f64,
    pub errors: usize,
    pub completed_at: DateTime<Utc>,
    pub prompt: String,
}

/// How often a given expected/typed pair has been mistyped across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonError {
    pub expected_char: char,
    pub typed_char: char,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_report_accepts_client_payload() {
        let json = r#"{
            "text_id": 7,
            "wpm": 42.5,
            "accuracy": 96.0,
            "errors": 1,
            "error_details": [{"expected_char": "l", "typed_char": "x", "position": 3}],
            "error_words": ["hello"]
        }"#;

        let report: SessionReport = serde_json::from_str(json).unwrap();

        assert_eq!(report.text_id, 7);
        assert_eq!(report.errors, 1);
        assert_eq!(
            report.error_details,
            vec![CharMismatch {
                expected_char: 'l',
                typed_char: 'x',
                position: 3
            }]
        );
        assert_eq!(report.error_words, vec!["hello".to_string()]);
    }

    #[test]
    fn session_report_details_default_to_empty() {
        let json = r#"{"text_id": 1, "wpm": 10.0, "accuracy": 100.0, "errors": 0}"#;
        let report: SessionReport = serde_json::from_str(json).unwrap();

        assert!(report.error_details.is_empty());
        assert!(report.error_words.is_empty());
    }

    #[test]
    fn mismatch_rejects_multi_char_strings() {
        let json = r#"{"expected_char": "ab", "typed_char": "x", "position": 0}"#;
        assert!(serde_json::from_str::<CharMismatch>(json).is_err());
    }
}
