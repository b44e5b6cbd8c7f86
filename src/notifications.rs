//! User-facing messages shown after a redirect.
//!
//! The core only produces the text and severity; rendering belongs to the
//! presentation layer.

use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Danger,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Severity::Danger, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }
}

/// Shared queue of pending notices, drained by the presentation layer
#[derive(Clone, Default)]
pub struct Notifications {
    pending: Arc<Mutex<Vec<Notice>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: Notice) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(notice);
        }
    }

    /// Take every pending notice in the order they were produced
    pub fn drain(&self) -> Vec<Notice> {
        if let Ok(mut pending) = self.pending.lock() {
            std::mem::take(&mut *pending)
        } else {
            Vec::new()
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|pending| pending.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
