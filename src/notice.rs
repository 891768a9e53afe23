//! Transient notifications passed from a boundary to the page.
//!
//! The relay endpoint answers with a [`Notice`] that the contact page shows
//! as a toast, and a failed catalog load produces one for the gallery page.
//! Notices are plain values; nothing holds global toast state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Shown after a quote request went through.
    pub fn quote_sent() -> Self {
        Self::success(
            "Quote Request Sent!",
            "We'll contact you within 24 hours to schedule your free consultation.",
        )
    }

    /// Shown when a quote request could not be delivered.
    pub fn quote_failed() -> Self {
        Self::error(
            "Error",
            "Failed to send quote request. Please try again or call us directly.",
        )
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}
