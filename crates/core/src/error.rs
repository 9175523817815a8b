use thiserror::Error;

pub const GENERIC_SEARCH_FAILURE: &str = "Search failed";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search backend returned status {status}")]
    BackendResponse { status: u16, detail: Option<String> },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// Text shown in the inline error region: the backend's `detail` when it sent one,
    /// otherwise the generic failure message.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::BackendResponse {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => GENERIC_SEARCH_FAILURE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback backend returned {status}")]
    BackendResponse { status: u16 },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no preference location available: {0}")]
    MissingLocation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid backend url {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("backend url {0} cannot be used as a base")]
    NotABase(String),
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
