//! Organization navigation model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MemberRole;

/// One section link in the organization navigation bar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationItem {
    pub name: String,
    pub href: String,
    /// Whether `href` is the section currently being viewed
    pub current: bool,
    pub admin_only: bool,
}

/// Entry of the organization switcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationLink {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationNavigation {
    pub organization_id: Uuid,
    pub organization_name: String,
    pub user_role: MemberRole,
    pub items: Vec<NavigationItem>,
    pub organizations: Vec<OrganizationLink>,
}
