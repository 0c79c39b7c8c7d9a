//! User-facing notices.
//!
//! The host shows these as translated toasts. Delivery is fire-and-forget:
//! nothing the compositor does depends on whether a notice was displayed.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message for the user, keyed for translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Translation key, e.g. `Map.ZoomTooLow`.
    pub key: &'static str,
    /// Untranslated detail (error text, zoom values).
    pub detail: String,
}

impl Notice {
    #[must_use]
    pub fn warning(key: &'static str, detail: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, key, detail: detail.into() }
    }

    #[must_use]
    pub fn error(key: &'static str, detail: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, key, detail: detail.into() }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only logs. Used by the headless driver.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Warning => tracing::warn!(key = notice.key, detail = %notice.detail, "notice"),
            NoticeLevel::Error => tracing::error!(key = notice.key, detail = %notice.detail, "notice"),
        }
    }
}

/// Notifier that keeps every notice, for inspection.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notices received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut guard) => guard.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
