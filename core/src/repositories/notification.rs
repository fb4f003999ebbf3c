//! Notification persistence.

use std::sync::Arc;

use serde_json::Value;
use validator::Validate;

use crate::domain::entities::{NewNotification, Notification};
use crate::errors::DomainResult;
use crate::store::{Collection, DocumentStore, Filter, FindOptions, Patch, Sort};

#[derive(Clone)]
pub struct NotificationRepository {
    notifications: Collection<Notification>,
}

impl NotificationRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            notifications: Collection::new(store),
        }
    }

    /// Create an unread notification. Without a recipient it is a broadcast.
    pub async fn create(&self, input: NewNotification) -> DomainResult<Notification> {
        input.validate()?;
        let mut notification = Notification::from_new(input);
        self.notifications.insert(&mut notification).await?;

        tracing::debug!(
            notification_id = %notification.id,
            broadcast = notification.is_broadcast(),
            event = "notification_created",
            "Created notification"
        );
        Ok(notification)
    }

    /// Notifications addressed to the user plus broadcasts, newest first
    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Notification>> {
        let filter = Filter::Or(vec![
            Filter::eq("user_id", user_id),
            Filter::Eq("user_id".to_string(), Value::Null),
        ]);
        let options = FindOptions::default().sorted(Sort::descending("created_at"));
        Ok(self.notifications.find_many(&filter, &options).await?)
    }

    /// Mark as read; returns whether the notification changed
    pub async fn mark_read(&self, id: &str) -> DomainResult<bool> {
        let result = self
            .notifications
            .update_one(&Filter::id(id), &Patch::new().set("is_read", true))
            .await?;
        Ok(result.modified > 0)
    }
}
