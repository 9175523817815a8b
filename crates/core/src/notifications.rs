use crate::traits::Notifier;
use crate::Notification;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Posted {
    notification: Notification,
    expires_at: Instant,
    shown: bool,
}

/// Holds transient notifications until their display duration runs out.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    posted: Arc<Mutex<Vec<Posted>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        let expires_at = Instant::now() + notification.duration();
        self.posted.lock().push(Posted {
            notification,
            expires_at,
            shown: false,
        });
    }

    /// Notifications still on display, oldest first. Expired ones are dropped.
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut posted = self.posted.lock();
        posted.retain(|entry| entry.expires_at > now);
        posted
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    /// Live notifications that have not been handed out by this method before.
    pub fn take_new(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut posted = self.posted.lock();
        posted.retain(|entry| entry.expires_at > now);
        posted
            .iter_mut()
            .filter(|entry| !entry.shown)
            .map(|entry| {
                entry.shown = true;
                entry.notification.clone()
            })
            .collect()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        self.push(notification);
    }
}
