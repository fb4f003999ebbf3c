//! Listing entity: a property offered on the marketplace by a lister.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::timestamp;
use crate::store::Patch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Hidden,
    #[default]
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Hidden => "hidden",
            ListingStatus::Pending => "pending",
            ListingStatus::Verified => "verified",
            ListingStatus::Rejected => "rejected",
            ListingStatus::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub property_id: String,

    pub lister_id: String,

    #[serde(default)]
    pub status: ListingStatus,

    #[serde(default)]
    pub views_count: u64,

    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewListing {
    #[validate(length(min = 1))]
    pub property_id: String,

    #[validate(length(min = 1))]
    pub lister_id: String,

    /// Defaults to `pending`
    pub status: Option<ListingStatus>,

    pub expires_at: Option<DateTime<Utc>>,
}

impl NewListing {
    pub fn new(property_id: impl Into<String>, lister_id: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            lister_id: lister_id.into(),
            status: None,
            expires_at: None,
        }
    }

    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = Some(status);
        self
    }
}

impl Listing {
    pub fn from_new(input: NewListing) -> Self {
        let now = timestamp::now();
        Self {
            id: String::new(),
            property_id: input.property_id,
            lister_id: input.lister_id,
            status: input.status.unwrap_or_default(),
            views_count: 0,
            verified_at: None,
            verified_by: None,
            rejection_reason: None,
            expires_at: input.expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.status, ListingStatus::Active | ListingStatus::Verified)
    }
}

/// Moderation or lifecycle change of a listing's status
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingStatusUpdate {
    pub status: ListingStatus,

    #[validate(length(min = 1))]
    pub verified_by: Option<String>,

    /// Stamped with the current time when moving to `verified` without one
    pub verified_at: Option<DateTime<Utc>>,

    #[validate(length(min = 1))]
    pub rejection_reason: Option<String>,

    pub expires_at: Option<DateTime<Utc>>,
}

impl ListingStatusUpdate {
    pub fn new(status: ListingStatus) -> Self {
        Self {
            status,
            verified_by: None,
            verified_at: None,
            rejection_reason: None,
            expires_at: None,
        }
    }

    pub fn to_patch(&self, now: &DateTime<Utc>) -> Patch {
        let verified_at = match (self.status, self.verified_at) {
            (_, Some(at)) => Some(at),
            (ListingStatus::Verified, None) => Some(*now),
            _ => None,
        };
        Patch::new()
            .set("status", self.status.as_str())
            .set_opt("verified_by", self.verified_by.clone())
            .set_opt("verified_at", verified_at.as_ref().map(timestamp::to_value))
            .set_opt("rejection_reason", self.rejection_reason.clone())
            .set_opt("expires_at", self.expires_at.as_ref().map(timestamp::to_value))
            .set("updated_at", timestamp::to_value(now))
    }
}
