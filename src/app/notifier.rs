use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long an error toast stays on screen.
const ERROR_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Info,
}

#[derive(Debug)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

/// Short-lived toasts shown in the bottom-right corner.
pub struct Notifier {
    notifications: VecDeque<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>, ttl: Duration) {
        self.add(message.into(), NotificationKind::Info, ttl);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(message.into(), NotificationKind::Error, ERROR_TTL);
    }

    pub fn recent(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    pub fn prune_expired(&mut self) {
        self.prune_at(Instant::now());
    }

    fn prune_at(&mut self, now: Instant) {
        self.notifications.retain(|n| n.expires_at > now);
    }

    fn add(&mut self, message: String, kind: NotificationKind, ttl: Duration) {
        self.notifications.push_back(Notification {
            message,
            kind,
            expires_at: Instant::now() + ttl,
        });
    }
}
