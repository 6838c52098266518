//! User-visible notifications.
//!
//! The controller publishes one notification per completed user action:
//! an info line on success, an error line on failure. The UI subscribes
//! through [`WorkflowController::subscribe`](crate::WorkflowController::subscribe).

use serde::{Deserialize, Serialize};

use crate::{RuleflowError, utils};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Message shown to the user after an action resolves.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Timestamp in milliseconds.
    pub timestamp: i64,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            timestamp: utils::time::time_millis(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            timestamp: utils::time::time_millis(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl From<&RuleflowError> for Notification {
    fn from(err: &RuleflowError) -> Self {
        Notification::error(err.to_string())
    }
}
