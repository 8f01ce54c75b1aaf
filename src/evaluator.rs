use crate::error::EngineError;
use crate::models::{CharMismatch, ProgressSnapshot, SessionReport, SessionResult};
use tracing::warn;

/// Standard approximation used for words-per-minute
pub const CHARS_PER_WORD: f64 = 5.0;

/// Forward-pass ledger of every position where `typed` differs from `reference`.
///
/// Only the common prefix is compared, so extra typed characters past the end
/// of the reference never produce entries. Positions are strictly increasing.
pub fn transcript_mismatches(reference: &str, typed: &str) -> Vec<CharMismatch> {
    mismatches(reference, typed).collect()
}

fn mismatches<'a>(reference: &'a str, typed: &'a str) -> impl Iterator<Item = CharMismatch> + 'a {
    reference
        .chars()
        .zip(typed.chars())
        .enumerate()
        .filter(|(_, (expected, actual))| expected != actual)
        .map(|(position, (expected_char, typed_char))| CharMismatch {
            expected_char,
            typed_char,
            position,
        })
}

/// Words per minute for `chars` typed over `elapsed_secs`, zero when no time has passed
pub fn words_per_minute(chars: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 && elapsed_secs.is_finite() {
        (chars as f64 / CHARS_PER_WORD) / (elapsed_secs / 60.0)
    } else {
        0.0
    }
}

/// Share of `typed` characters that were not errors, as a percentage
pub fn accuracy(typed: usize, errors: usize) -> f64 {
    if typed > 0 {
        100.0 * typed.saturating_sub(errors) as f64 / typed as f64
    } else {
        0.0
    }
}

/// Live progress of `typed` against `reference` after `elapsed_secs`.
///
/// `correct` only looks at the newest keystroke so a client can flag the
/// latest error cheaply; it can be true while earlier positions are wrong.
pub fn check_progress(reference: &str, typed: &str, elapsed_secs: f64) -> ProgressSnapshot {
    let total_length = reference.chars().count();
    let position = typed.chars().count().min(total_length);
    let error_count = mismatches(reference, typed).count();

    let correct = if position > 0 && position < total_length {
        reference.chars().nth(position - 1) == typed.chars().nth(position - 1)
    } else {
        true
    };

    ProgressSnapshot {
        correct,
        current_wpm: words_per_minute(position, elapsed_secs),
        current_accuracy: accuracy(position, error_count),
        position,
        total_length,
        error_count,
    }
}

/// Validate a client report and turn it into the immutable session result.
///
/// Metrics and mismatches are forwarded as reported; only values outside
/// their valid range are clamped. Browser clients re-report corrected
/// keystrokes, so a ledger that is unordered or disagrees with the error
/// count is logged and kept rather than rejected.
pub fn finalize(report: SessionReport) -> Result<SessionResult, EngineError> {
    if report.text_id <= 0 {
        return Err(EngineError::invalid(format!(
            "text id must be positive, got {}",
            report.text_id
        )));
    }

    if let Some(pair) = report
        .error_details
        .windows(2)
        .find(|pair| pair[1].position <= pair[0].position)
    {
        warn!(
            "text {}: mismatch positions not strictly increasing ({} followed by {})",
            report.text_id, pair[0].position, pair[1].position
        );
    }

    if report.errors != report.error_details.len() {
        warn!(
            "text {}: error count {} does not match {} reported mismatches",
            report.text_id,
            report.errors,
            report.error_details.len()
        );
    }

    Ok(SessionResult {
        text_id: report.text_id,
        wpm: clamp_wpm(report.wpm),
        accuracy: clamp_accuracy(report.accuracy),
        error_count: report.errors,
        mismatches: report.error_details,
    })
}

fn clamp_wpm(wpm: f64) -> f64 {
    if wpm.is_nan() || wpm < 0.0 {
        0.0
    } else {
        wpm
    }
}

fn clamp_accuracy(accuracy: f64) -> f64 {
    if accuracy.is_nan() {
        0.0
    } else {
        accuracy.clamp(0.0, 100.0)
    }
}
