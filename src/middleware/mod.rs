//! Middleware components
//!
//! This module contains middleware for:
//! - Authentication (JWT)
//! - Organization membership extractors

pub mod auth;
pub mod organization;

pub use auth::{auth_middleware, AuthUser, Claims};
pub use organization::{OrgAdmin, OrgMember};
