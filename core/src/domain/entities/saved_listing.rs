//! A listing bookmarked by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedListing {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub user_id: String,

    pub listing_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(with = "timestamp")]
    pub saved_at: DateTime<Utc>,
}

impl SavedListing {
    pub fn new(user_id: impl Into<String>, listing_id: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            listing_id: listing_id.into(),
            notes,
            saved_at: timestamp::now(),
        }
    }
}
