use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TOP_K: usize = 5;
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Body of `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: usize,
    pub rerank: bool,
}

/// One matched sentence, in the order the backend ranked it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub sentence_hash: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

impl SearchResult {
    pub fn source_label(&self) -> &str {
        self.source
            .as_deref()
            .filter(|source| !source.is_empty())
            .unwrap_or(UNKNOWN_SOURCE)
    }

    /// Score rounded to four decimals, empty when the backend sent none.
    pub fn score_label(&self) -> String {
        self.score
            .map(|score| format!("{score:.4}"))
            .unwrap_or_default()
    }

    pub fn justification_text(&self) -> Option<&str> {
        self.justification
            .as_deref()
            .filter(|justification| !justification.is_empty())
    }
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackEvent {
    pub query: String,
    pub sentence_hash: String,
    pub is_relevant: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub query: String,
    pub top_k: usize,
    pub rerank: bool,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: DEFAULT_TOP_K,
            rerank: true,
            results: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl SessionState {
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            top_k: self.top_k,
            rerank: self.rerank,
        }
    }
}

pub fn clamp_top_k(value: i64) -> usize {
    usize::try_from(value.max(1)).unwrap_or(usize::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient, non-blocking message. It expires after [`Notification::duration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn duration(&self) -> Duration {
        match self.kind {
            NotificationKind::Success => Duration::from_millis(2_000),
            NotificationKind::Error => Duration::from_millis(4_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(source: Option<&str>, score: Option<f64>, justification: Option<&str>) -> SearchResult {
        SearchResult {
            sentence_hash: "abc123".to_string(),
            text: "Built distributed backend services in Rust".to_string(),
            source: source.map(str::to_string),
            score,
            justification: justification.map(str::to_string),
        }
    }

    #[test]
    fn defaults_match_a_fresh_session() {
        let state = SessionState::default();
        assert_eq!(state.query, "");
        assert_eq!(state.top_k, 5);
        assert!(state.rerank);
        assert!(state.results.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn top_k_is_clamped_to_one() {
        for raw in [i64::MIN, -3, 0, 1] {
            assert_eq!(clamp_top_k(raw), 1);
        }
        assert_eq!(clamp_top_k(12), 12);
        assert_eq!(clamp_top_k(clamp_top_k(-7) as i64), 1);
    }

    #[test]
    fn missing_or_empty_source_renders_unknown() {
        assert_eq!(result(None, None, None).source_label(), UNKNOWN_SOURCE);
        assert_eq!(result(Some(""), None, None).source_label(), UNKNOWN_SOURCE);
        assert_eq!(result(Some("cv_jane.pdf"), None, None).source_label(), "cv_jane.pdf");
    }

    #[test]
    fn score_is_rounded_to_four_decimals() {
        assert_eq!(result(None, Some(0.873_456_1), None).score_label(), "0.8735");
        assert_eq!(result(None, Some(1.0), None).score_label(), "1.0000");
        assert_eq!(result(None, None, None).score_label(), "");
    }

    #[test]
    fn empty_justification_is_hidden() {
        assert_eq!(result(None, None, Some("")).justification_text(), None);
        assert_eq!(
            result(None, None, Some("Matches Rust experience")).justification_text(),
            Some("Matches Rust experience")
        );
    }

    #[test]
    fn optional_fields_may_be_absent_on_the_wire() -> Result<(), serde_json::Error> {
        let parsed: SearchResult =
            serde_json::from_str(r#"{"sentence_hash":"h1","text":"Led a team of five"}"#)?;
        assert_eq!(parsed.source, None);
        assert_eq!(parsed.score, None);
        assert_eq!(parsed.justification, None);
        Ok(())
    }

    #[test]
    fn request_uses_snake_case_top_k() -> Result<(), serde_json::Error> {
        let request = SessionState {
            query: "backend engineer".to_string(),
            ..SessionState::default()
        }
        .to_request();
        let body = serde_json::to_value(&request)?;
        assert_eq!(
            body,
            serde_json::json!({"query": "backend engineer", "top_k": 5, "rerank": true})
        );
        Ok(())
    }
}
