//! Role-gated organization navigation

use uuid::Uuid;

use crate::models::{MemberRole, NavigationItem};

struct Section {
    name: &'static str,
    /// Path below `/org/{id}`; empty for the dashboard
    suffix: &'static str,
    admin_only: bool,
}

const SECTIONS: &[Section] = &[
    Section {
        name: "Dashboard",
        suffix: "",
        admin_only: false,
    },
    Section {
        name: "Expenses",
        suffix: "/expenses",
        admin_only: false,
    },
    Section {
        name: "Categories",
        suffix: "/categories",
        admin_only: true,
    },
    Section {
        name: "Members",
        suffix: "/members",
        admin_only: true,
    },
    Section {
        name: "Reports",
        suffix: "/reports",
        admin_only: true,
    },
];

/// Sections of an organization visible to a caller with `role`.
///
/// The dashboard is current only on an exact path match; other sections are
/// current for any path below them.
pub fn navigation_items(
    organization_id: Uuid,
    role: MemberRole,
    current_path: Option<&str>,
) -> Vec<NavigationItem> {
    let base = format!("/org/{}", organization_id);

    SECTIONS
        .iter()
        .filter(|section| !section.admin_only || role.is_admin())
        .map(|section| {
            let href = format!("{}{}", base, section.suffix);
            let current = match current_path {
                Some(path) if section.suffix.is_empty() => path == href,
                Some(path) => path.starts_with(&href),
                None => false,
            };
            NavigationItem {
                name: section.name.to_string(),
                href,
                current,
                admin_only: section.admin_only,
            }
        })
        .collect()
}
