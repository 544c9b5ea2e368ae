//! One-shot notifications.
//!
//! A [`ToastFeed`] is an append-only, bounded log of toasts shared by every
//! view in a browser context. Each view reads it through its own
//! [`ToastReader`], which remembers how far it has read: a toast is shown
//! once per view, no matter how often the view re-renders.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Oldest toasts are discarded beyond this many.
const FEED_CAPACITY: usize = 64;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Error,
}

impl ToastLevel {
    /// CSS modifier used by the page template.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    /// Position in the feed; strictly increasing.
    pub seq: u64,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct FeedInner {
    next_seq: u64,
    toasts: VecDeque<Toast>,
}

/// Shared toast log. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct ToastFeed {
    inner: Arc<Mutex<FeedInner>>,
}

impl ToastFeed {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FeedInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a toast.
    pub fn push(&self, level: ToastLevel, message: impl Into<String>) -> Toast {
        let mut inner = self.lock();
        inner.next_seq += 1;
        let toast = Toast {
            id: Uuid::new_v4(),
            seq: inner.next_seq,
            level,
            message: message.into(),
            created_at: Utc::now(),
        };
        inner.toasts.push_back(toast.clone());
        while inner.toasts.len() > FEED_CAPACITY {
            inner.toasts.pop_front();
        }
        tracing::debug!(seq = toast.seq, level = ?level, message = %toast.message, "Toast queued");
        toast
    }

    /// Append a success toast.
    pub fn success(&self, message: impl Into<String>) -> Toast {
        self.push(ToastLevel::Success, message)
    }

    /// Append an error toast.
    pub fn error(&self, message: impl Into<String>) -> Toast {
        self.push(ToastLevel::Error, message)
    }

    /// A reader positioned after the newest toast.
    ///
    /// Toasts pushed before the reader was created are never shown to it.
    #[must_use]
    pub fn reader(&self) -> ToastReader {
        ToastReader {
            feed: self.clone(),
            cursor: self.lock().next_seq,
        }
    }

    /// Number of toasts ever pushed.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.lock().next_seq
    }
}

/// Per-view cursor over a [`ToastFeed`].
#[derive(Debug, Clone)]
pub struct ToastReader {
    feed: ToastFeed,
    cursor: u64,
}

impl ToastReader {
    /// Toasts this reader has not seen yet, oldest first. Each toast is
    /// returned exactly once.
    pub fn take(&mut self) -> Vec<Toast> {
        let inner = self.feed.lock();
        let unseen: Vec<Toast> = inner
            .toasts
            .iter()
            .filter(|toast| toast.seq > self.cursor)
            .cloned()
            .collect();
        self.cursor = inner.next_seq;
        unseen
    }

    /// Whether unseen toasts are waiting.
    #[must_use]
    pub fn has_unseen(&self) -> bool {
        self.feed.lock().next_seq > self.cursor
    }
}
