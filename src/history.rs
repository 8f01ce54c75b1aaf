use crate::models::SessionSummary;
use serde::Serialize;

/// Aggregate view over a list of stored sessions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistorySummary {
    pub sessions: usize,
    pub mean_wpm: f64,
    pub mean_accuracy: f64,
    /// Spread of wpm between sessions, a rough consistency measure
    pub wpm_std_dev: f64,
}

impl HistorySummary {
    /// All figures are zero for an empty history
    pub fn from_sessions(sessions: &[SessionSummary]) -> Self {
        if sessions.is_empty() {
            return Self {
                sessions: 0,
                mean_wpm: 0.0,
                mean_accuracy: 0.0,
                wpm_std_dev: 0.0,
            };
        }

        let n = sessions.len() as f64;
        let (wpm_total, accuracy_total) = sessions
            .iter()
            .fold((0.0, 0.0), |(w, a), s| (w + s.wpm, a + s.accuracy));
        let mean_wpm = wpm_total / n;

        // population variance over the listed sessions
        let variance = sessions
            .iter()
            .map(|s| (s.wpm - mean_wpm).powi(2))
            .sum::<f64>()
            / n;

        Self {
            sessions: sessions.len(),
            mean_wpm,
            mean_accuracy: accuracy_total / n,
            wpm_std_dev: variance.sqrt(),
        }
    }
}
