//! Audit log persistence.

use std::sync::Arc;

use validator::Validate;

use crate::domain::entities::{AuditLog, NewAuditLog};
use crate::errors::DomainResult;
use crate::store::{Collection, DocumentStore, Filter, FindOptions, Sort};

use super::DEFAULT_LIST_LIMIT;

/// Optional criteria for reading the audit trail
#[derive(Debug, Clone, Default)]
pub struct AuditLogQuery {
    pub action: Option<String>,
    pub user_id: Option<String>,
    pub limit: Option<usize>,
}

impl AuditLogQuery {
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_filter(&self) -> Filter {
        let mut filter = Filter::All;
        if let Some(action) = &self.action {
            filter = filter.and(Filter::eq("action", action.as_str()));
        }
        if let Some(user_id) = &self.user_id {
            filter = filter.and(Filter::eq("user_id", user_id.as_str()));
        }
        filter
    }
}

#[derive(Clone)]
pub struct AuditLogRepository {
    logs: Collection<AuditLog>,
}

impl AuditLogRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            logs: Collection::new(store),
        }
    }

    pub async fn create(&self, input: NewAuditLog) -> DomainResult<AuditLog> {
        input.validate()?;
        let mut log = AuditLog::from_new(input);
        self.logs.insert(&mut log).await?;
        Ok(log)
    }

    /// Matching entries, newest first
    pub async fn list(&self, query: &AuditLogQuery) -> DomainResult<Vec<AuditLog>> {
        let options = FindOptions::limit(query.limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .sorted(Sort::descending("timestamp"));
        Ok(self.logs.find_many(&query.to_filter(), &options).await?)
    }
}
