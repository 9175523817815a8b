use crate::traits::{FeedbackBackend, Notifier};
use crate::{FeedbackEvent, Notification};
use tracing::{info, warn};

pub const MARKED_RELEVANT: &str = "Marked Relevant";
pub const MARKED_NOT_RELEVANT: &str = "Marked Not Relevant";
pub const FEEDBACK_FAILED: &str = "Feedback failed";

/// Reports relevance judgments. Never touches the search session; every outcome ends
/// up as exactly one transient notification.
pub struct FeedbackSubmitter<B, N> {
    backend: B,
    notifier: N,
}

impl<B, N> FeedbackSubmitter<B, N>
where
    B: FeedbackBackend + Send + Sync,
    N: Notifier + Send + Sync,
{
    pub fn new(backend: B, notifier: N) -> Self {
        Self { backend, notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Sends one judgment and returns the notification that was raised for it.
    pub async fn send_feedback(
        &self,
        query: impl Into<String>,
        sentence_hash: impl Into<String>,
        is_relevant: bool,
    ) -> Notification {
        let event = FeedbackEvent {
            query: query.into(),
            sentence_hash: sentence_hash.into(),
            is_relevant,
        };

        let notification = match self.backend.send_feedback(&event).await {
            Ok(()) => {
                info!(
                    sentence_hash = %event.sentence_hash,
                    is_relevant,
                    "feedback recorded"
                );
                Notification::success(if is_relevant {
                    MARKED_RELEVANT
                } else {
                    MARKED_NOT_RELEVANT
                })
            }
            Err(error) => {
                warn!(sentence_hash = %event.sentence_hash, error = %error, "feedback failed");
                Notification::error(FEEDBACK_FAILED)
            }
        };

        self.notifier.notify(notification.clone());
        notification
    }
}
