//! User entity representing a marketplace account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::domain::timestamp;
use crate::store::Patch;

/// Role a user plays on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Visitor,
    Buyer,
    Renter,
    Lister,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Visitor => "visitor",
            UserRole::Buyer => "buyer",
            UserRole::Renter => "renter",
            UserRole::Lister => "lister",
            UserRole::Admin => "admin",
        }
    }
}

/// Identity verification state of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    NotSubmitted,
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::NotSubmitted => "not_submitted",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity.
///
/// The identifier is the stable external account id (e.g. the identity
/// provider's uid); it is never generated by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    pub email: String,

    pub name: String,

    pub role: UserRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,

    #[serde(default)]
    pub verification_status: VerificationStatus,

    #[serde(default)]
    pub two_factor_enabled: bool,

    #[serde(default)]
    pub is_suspended: bool,

    #[serde(default)]
    pub is_banned: bool,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 128))]
    pub id: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub role: UserRole,

    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,

    pub profile_picture: Option<String>,

    /// Defaults to `not_submitted`
    pub verification_status: Option<VerificationStatus>,
}

impl NewUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role,
            phone: None,
            profile_picture: None,
            verification_status: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_verification_status(mut self, status: VerificationStatus) -> Self {
        self.verification_status = Some(status);
        self
    }
}

impl User {
    /// Build a user from validated input, applying account defaults
    pub fn from_new(input: NewUser) -> Self {
        let now = timestamp::now();
        Self {
            id: input.id,
            email: input.email,
            name: input.name,
            role: input.role,
            phone: input.phone,
            profile_picture: input.profile_picture,
            verification_status: input.verification_status.unwrap_or_default(),
            two_factor_enabled: false,
            is_suspended: false,
            is_banned: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    /// Whether the account may currently act on the marketplace
    pub fn is_active(&self) -> bool {
        !self.is_suspended && !self.is_banned
    }
}

/// Partial update of a user's profile. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    pub role: Option<UserRole>,

    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,

    pub profile_picture: Option<String>,

    pub two_factor_enabled: Option<bool>,

    pub is_suspended: Option<bool>,

    pub is_banned: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.role.is_none()
            && self.phone.is_none()
            && self.profile_picture.is_none()
            && self.two_factor_enabled.is_none()
            && self.is_suspended.is_none()
            && self.is_banned.is_none()
    }

    /// Store patch for this update, stamping `updated_at`
    pub fn to_patch(&self, now: &DateTime<Utc>) -> Patch {
        Patch::new()
            .set_opt("email", self.email.clone())
            .set_opt("name", self.name.clone())
            .set_opt("role", self.role.map(|r| r.as_str()))
            .set_opt("phone", self.phone.clone())
            .set_opt("profile_picture", self.profile_picture.clone())
            .set_opt("two_factor_enabled", self.two_factor_enabled)
            .set_opt("is_suspended", self.is_suspended)
            .set_opt("is_banned", self.is_banned)
            .set("updated_at", timestamp::to_value(now))
    }
}
