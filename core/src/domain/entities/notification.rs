//! User-facing notifications. A notification without a recipient is a
//! broadcast delivered to every user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    System,
    ListingUpdate,
    Message,
    Verification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Recipient; `None` for broadcasts
    #[serde(default)]
    pub user_id: Option<String>,

    pub title: String,

    pub message: String,

    pub notification_type: NotificationType,

    #[serde(default)]
    pub is_read: bool,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewNotification {
    #[validate(length(min = 1))]
    pub user_id: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub message: String,

    pub notification_type: NotificationType,
}

impl NewNotification {
    pub fn to_user(
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        notification_type: NotificationType,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            title: title.into(),
            message: message.into(),
            notification_type,
        }
    }

    pub fn broadcast(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: None,
            title: title.into(),
            message: message.into(),
            notification_type: NotificationType::System,
        }
    }
}

impl Notification {
    pub fn from_new(input: NewNotification) -> Self {
        Self {
            id: String::new(),
            user_id: input.user_id,
            title: input.title,
            message: input.message,
            notification_type: input.notification_type,
            is_read: false,
            created_at: timestamp::now(),
        }
    }

    pub fn is_broadcast(&self) -> bool {
        self.user_id.is_none()
    }
}
