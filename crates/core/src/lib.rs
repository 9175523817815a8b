pub mod backend;
pub mod config;
pub mod error;
pub mod feedback;
pub mod models;
pub mod notifications;
pub mod preference;
pub mod session;
pub mod traits;

pub use backend::HttpBackend;
pub use config::{ClientConfig, API_KEY_HEADER, DEFAULT_API_URL};
pub use error::{ConfigError, FeedbackError, PreferenceError, SearchError, GENERIC_SEARCH_FAILURE};
pub use feedback::{FeedbackSubmitter, FEEDBACK_FAILED, MARKED_NOT_RELEVANT, MARKED_RELEVANT};
pub use models::{
    clamp_top_k, FeedbackEvent, Notification, NotificationKind, SearchRequest, SearchResult,
    SessionState, DEFAULT_TOP_K, UNKNOWN_SOURCE,
};
pub use notifications::NotificationCenter;
pub use preference::{default_preference_path, DisplayPreferenceStore, DARK_MODE_KEY};
pub use session::{SearchAttempt, SearchSession, Submission};
pub use traits::{FeedbackBackend, Notifier, PreferenceObserver, SearchBackend};
