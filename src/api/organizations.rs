//! Organization API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    middleware::{AuthUser, OrgAdmin, OrgMember},
    models::{
        CreateOrganizationRequest, MemberWithUser, Organization, OrganizationDetail,
        OrganizationNavigation, OrganizationSummary, RemovedMember,
    },
    services::OrganizationService,
    utils::{parse_id, AppResult, ValidatedJson},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route("/{organization_id}", get(get_organization))
        .route("/{organization_id}/members", get(list_members))
        .route(
            "/{organization_id}/members/{user_id}",
            delete(remove_member),
        )
        .route("/{organization_id}/navigation", get(get_navigation))
}

#[derive(Debug, Deserialize)]
struct NavigationQuery {
    current_path: Option<String>,
}

/// POST /api/v1/organizations
async fn create_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateOrganizationRequest>,
) -> AppResult<(StatusCode, Json<Organization>)> {
    let org = OrganizationService::new(&state.db)
        .create(auth_user.user_id(), &req)
        .await?;

    Ok((StatusCode::CREATED, Json(org)))
}

/// GET /api/v1/organizations
async fn list_organizations(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<OrganizationSummary>>> {
    let orgs = OrganizationService::new(&state.db)
        .list_by_user(auth_user.user_id())
        .await?;

    Ok(Json(orgs))
}

/// GET /api/v1/organizations/{organization_id}
async fn get_organization(
    State(state): State<AppState>,
    OrgMember(ctx): OrgMember,
) -> AppResult<Json<OrganizationDetail>> {
    let detail = OrganizationService::new(&state.db).get_by_id(&ctx).await?;
    Ok(Json(detail))
}

/// GET /api/v1/organizations/{organization_id}/members
async fn list_members(
    State(state): State<AppState>,
    OrgMember(ctx): OrgMember,
) -> AppResult<Json<Vec<MemberWithUser>>> {
    let members = OrganizationService::new(&state.db)
        .list_members(&ctx)
        .await?;

    Ok(Json(members))
}

/// DELETE /api/v1/organizations/{organization_id}/members/{user_id}
async fn remove_member(
    State(state): State<AppState>,
    OrgAdmin(ctx): OrgAdmin,
    Path((_, user_id)): Path<(String, String)>,
) -> AppResult<Json<RemovedMember>> {
    let user_id = parse_id(&user_id, "user ID")?;

    let removed = OrganizationService::new(&state.db)
        .remove_member(&ctx, user_id)
        .await?;

    Ok(Json(removed))
}

/// GET /api/v1/organizations/{organization_id}/navigation
async fn get_navigation(
    State(state): State<AppState>,
    OrgMember(ctx): OrgMember,
    Query(query): Query<NavigationQuery>,
) -> AppResult<Json<OrganizationNavigation>> {
    let nav = OrganizationService::new(&state.db)
        .navigation(&ctx, query.current_path.as_deref())
        .await?;

    Ok(Json(nav))
}
