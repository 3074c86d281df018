//! Bounded queue of player-facing notifications.

use crate::types::NotificationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum notifications kept. Older entries are evicted first.
pub const MAX_NOTIFICATIONS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Icon shown next to a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationIcon {
    Station,
    Train,
    Research,
    Era,
    Money,
    Info,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub icon: NotificationIcon,
    pub title: String,
    pub text: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Ring of the newest notifications plus the id counter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    next_id: NotificationId,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_NOTIFICATIONS + 1),
            next_id: 1,
        }
    }

    /// Append a notification, evicting the oldest when full. Returns its id.
    pub fn push(
        &mut self,
        icon: NotificationIcon,
        title: impl Into<String>,
        text: impl Into<String>,
        severity: Severity,
    ) -> NotificationId {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_back(Notification {
            id,
            icon,
            title: title.into(),
            text: text.into(),
            severity,
            created_at: Utc::now(),
        });
        while self.entries.len() > MAX_NOTIFICATIONS {
            self.entries.pop_front();
        }

        id
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}
