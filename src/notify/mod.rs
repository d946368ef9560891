//! User-facing notifications (toasts).
//!
//! Fire-and-forget: the flow shows a notification and moves on.

use std::fmt;

use crate::constants::{
    SAVE_FAILURE_MESSAGE, SAVE_FAILURE_TITLE, SAVE_SUCCESS_MESSAGE, SAVE_SUCCESS_TITLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// A toast: kind, a short title and a longer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn save_succeeded() -> Self {
        Self {
            kind: NotificationKind::Success,
            title: SAVE_SUCCESS_TITLE.to_string(),
            message: SAVE_SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn save_failed() -> Self {
        Self {
            kind: NotificationKind::Error,
            title: SAVE_FAILURE_TITLE.to_string(),
            message: SAVE_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.kind, self.title, self.message)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn show(&self, notification: Notification);
}

/// Notifier that writes toasts to the log and, optionally, to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier {
    echo_to_stderr: bool,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stderr(mut self) -> Self {
        self.echo_to_stderr = true;
        self
    }
}

impl Notifier for TracingNotifier {
    fn show(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(
                title = %notification.title,
                message = %notification.message,
                "Notification"
            ),
            NotificationKind::Error => tracing::warn!(
                title = %notification.title,
                message = %notification.message,
                "Notification"
            ),
        }

        if self.echo_to_stderr {
            eprintln!("{}", notification);
        }
    }
}
