use crate::error::Result;
use crate::{FeedbackError, FeedbackEvent, Notification, SearchRequest, SearchResult};
use async_trait::async_trait;

#[async_trait]
pub trait SearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>>;
}

#[async_trait]
pub trait FeedbackBackend {
    async fn send_feedback(&self, event: &FeedbackEvent) -> Result<(), FeedbackError>;
}

/// Receives transient notifications. Implementations must not block.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Presentation side of the display preference.
pub trait PreferenceObserver {
    fn apply(&self, dark_mode: bool);
}
