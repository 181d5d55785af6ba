//! Organization (tenant) model

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{MemberRole, UserSummary};

pub const ORGANIZATION_NAME_MAX_CHARS: usize = 100;
pub const ORGANIZATION_DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Creator of the organization; never reassigned
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(
        length(min = 1, message = "Organization name is required"),
        custom(function = "validate_name_max")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be less than 500 characters"))]
    pub description: Option<String>,
}

fn validate_name_max(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > ORGANIZATION_NAME_MAX_CHARS {
        return Err(ValidationError::new("length").with_message(Cow::Borrowed(
            "Organization name must be less than 100 characters",
        )));
    }
    Ok(())
}

/// One entry of the caller's organization list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub member_count: i64,
    /// The caller's role in this organization
    pub user_role: MemberRole,
}

/// Organization details as seen by one of its members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: Organization,
    pub owner: UserSummary,
    pub member_count: i64,
    pub user_role: MemberRole,
}
