//! Business logic services

pub mod access;
pub mod navigation;
pub mod organization;

pub use access::{AccessResolver, AdminContext, MemberContext};
pub use navigation::navigation_items;
pub use organization::OrganizationService;
