//! Bounded log of recent store activity, newest first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of notifications kept
pub const MAX_NOTIFICATIONS: usize = 10;

/// Severity tag of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A logged notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,

    #[serde(rename = "type")]
    pub severity: Severity,

    pub message: String,

    pub timestamp: DateTime<Utc>,
}

/// Notification payload before an id is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub severity: Severity,
    pub message: String,
}

impl NewNotification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }
}

/// Ring buffer of at most [`MAX_NOTIFICATIONS`] entries, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front, evicting the oldest entries past the limit
    pub fn push(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        self.entries.truncate(MAX_NOTIFICATIONS);
    }

    /// Remove by id, returning the entry if it was present
    pub fn remove(&mut self, id: &str) -> Option<Notification> {
        let pos = self.entries.iter().position(|n| n.id == id)?;
        self.entries.remove(pos)
    }

    /// Drop entries past the limit (used after rehydrating old snapshots)
    pub fn enforce_limit(&mut self) {
        self.entries.truncate(MAX_NOTIFICATIONS);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
