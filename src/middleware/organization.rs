//! Organization-scoped extractors
//!
//! Handlers nested under `/organizations/{organization_id}` take one of these
//! instead of resolving membership themselves. Extraction fails before the
//! handler body runs, so a scoped operation never executes for a caller that
//! lacks the required membership.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use super::AuthUser;
use crate::{
    services::{AccessResolver, AdminContext, MemberContext},
    utils::{validation::parse_id, AppError},
    AppState,
};

const ORGANIZATION_PARAM: &str = "organization_id";

/// Caller holds any membership in the organization named by the path
pub struct OrgMember(pub MemberContext);

/// Caller is an ADMIN of the organization named by the path
pub struct OrgAdmin(pub AdminContext);

async fn scope(parts: &mut Parts, state: &AppState) -> Result<(Uuid, Uuid), AppError> {
    let caller = parts
        .extensions
        .get::<AuthUser>()
        .map(AuthUser::user_id)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?;

    let raw = params
        .get(ORGANIZATION_PARAM)
        .ok_or_else(|| AppError::bad_request("Missing organization ID"))?;

    Ok((parse_id(raw, "organization ID")?, caller))
}

impl FromRequestParts<AppState> for OrgMember {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (organization_id, caller) = scope(parts, state).await?;
        AccessResolver::new(&state.db)
            .require_member(organization_id, caller)
            .await
            .map(OrgMember)
    }
}

impl FromRequestParts<AppState> for OrgAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (organization_id, caller) = scope(parts, state).await?;
        AccessResolver::new(&state.db)
            .require_admin(organization_id, caller)
            .await
            .map(OrgAdmin)
    }
}
