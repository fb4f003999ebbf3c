//! User persistence.

use std::sync::Arc;

use validator::Validate;

use crate::domain::entities::{NewUser, User, UserRole, UserUpdate};
use crate::domain::timestamp;
use crate::errors::{DomainError, DomainResult};
use crate::store::{Collection, DocumentStore, Filter, FindOptions};

use super::conflict_on_duplicate;

#[derive(Clone)]
pub struct UserRepository {
    users: Collection<User>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: Collection::new(store),
        }
    }

    /// Create a user with account defaults. Fails with `Conflict` when the
    /// identifier is already registered.
    pub async fn create(&self, input: NewUser) -> DomainResult<User> {
        input.validate()?;
        let mut user = User::from_new(input);
        let id = user.id.clone();

        self.users
            .insert(&mut user)
            .await
            .map_err(conflict_on_duplicate("User", &id))?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), event = "user_created", "Created user");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self.users.find_one(&Filter::eq("email", email)).await?)
    }

    pub async fn list_by_role(&self, role: UserRole, limit: usize) -> DomainResult<Vec<User>> {
        Ok(self
            .users
            .find_many(&Filter::eq("role", role.as_str()), &FindOptions::limit(limit))
            .await?)
    }

    /// Apply a profile update and return the stored user
    pub async fn update(&self, id: &str, update: UserUpdate) -> DomainResult<User> {
        update.validate()?;
        let now = timestamp::now();
        let result = self.users.update_one(&Filter::id(id), &update.to_patch(&now)).await?;
        if result.matched == 0 {
            return Err(DomainError::not_found("User", id));
        }

        tracing::debug!(user_id = id, event = "user_updated", "Updated user profile");
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Delete a user; returns whether one was removed
    pub async fn delete(&self, id: &str) -> DomainResult<bool> {
        let deleted = self.users.delete_one(&Filter::id(id)).await? > 0;
        if deleted {
            tracing::info!(user_id = id, event = "user_deleted", "Deleted user");
        }
        Ok(deleted)
    }
}
