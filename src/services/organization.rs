//! Organization procedures
//!
//! Business operations behind the organization API. Scoped operations take the
//! guard context produced by [`AccessResolver`](super::AccessResolver), so they
//! cannot run without the membership (or admin) check having passed.

use uuid::Uuid;
use validator::Validate;

use super::{navigation::navigation_items, AdminContext, MemberContext};
use crate::{
    db::{DbPool, MemberRepository, OrganizationRepository},
    models::{
        CreateOrganizationRequest, MemberWithUser, Organization, OrganizationDetail,
        OrganizationLink, OrganizationNavigation, OrganizationSummary, RemovedMember,
    },
    utils::{AppError, AppResult},
};

fn store_error(action: &'static str) -> impl FnOnce(anyhow::Error) -> AppError {
    move |e| AppError::store(action, e)
}

pub struct OrganizationService<'a> {
    pool: &'a DbPool,
}

impl<'a> OrganizationService<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create an organization owned by `caller_id`, who becomes its first ADMIN
    pub async fn create(
        &self,
        caller_id: Uuid,
        req: &CreateOrganizationRequest,
    ) -> AppResult<Organization> {
        req.validate()?;

        let org = OrganizationRepository::new(self.pool)
            .create_with_owner(caller_id, req)
            .await
            .map_err(store_error("create organization"))?;

        tracing::info!(organization_id = %org.id, owner_id = %caller_id, "Organization created");
        Ok(org)
    }

    pub async fn list_by_user(&self, caller_id: Uuid) -> AppResult<Vec<OrganizationSummary>> {
        OrganizationRepository::new(self.pool)
            .list_for_user(caller_id)
            .await
            .map_err(store_error("list organizations"))
    }

    pub async fn get_by_id(&self, ctx: &MemberContext) -> AppResult<OrganizationDetail> {
        let found = OrganizationRepository::new(self.pool)
            .get_with_owner(ctx.organization_id())
            .await
            .map_err(store_error("get organization"))?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        Ok(OrganizationDetail {
            organization: found.organization,
            owner: found.owner,
            member_count: found.member_count,
            user_role: ctx.role(),
        })
    }

    pub async fn list_members(&self, ctx: &MemberContext) -> AppResult<Vec<MemberWithUser>> {
        MemberRepository::new(self.pool)
            .list_with_users(ctx.organization_id())
            .await
            .map_err(store_error("list organization members"))
    }

    /// Remove `user_id` from the organization. The owner can never be removed.
    pub async fn remove_member(&self, ctx: &AdminContext, user_id: Uuid) -> AppResult<RemovedMember> {
        let organization_id = ctx.organization_id();

        let org = OrganizationRepository::new(self.pool)
            .get_by_id(organization_id)
            .await
            .map_err(store_error("get organization"))?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        if org.owner_id == user_id {
            return Err(AppError::bad_request("Cannot remove the organization owner"));
        }

        let deleted = MemberRepository::new(self.pool)
            .delete(organization_id, user_id)
            .await
            .map_err(store_error("remove organization member"))?;

        if !deleted {
            return Err(AppError::not_found("Member not found"));
        }

        tracing::info!(
            %organization_id,
            removed_user_id = %user_id,
            removed_by = %ctx.user_id(),
            "Organization member removed"
        );

        Ok(RemovedMember {
            user_id,
            organization_id,
        })
    }

    pub async fn navigation(
        &self,
        ctx: &MemberContext,
        current_path: Option<&str>,
    ) -> AppResult<OrganizationNavigation> {
        let repo = OrganizationRepository::new(self.pool);

        let org = repo
            .get_by_id(ctx.organization_id())
            .await
            .map_err(store_error("get organization"))?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        let organizations = repo
            .list_for_user(ctx.user_id())
            .await
            .map_err(store_error("list organizations"))?
            .into_iter()
            .map(|o| OrganizationLink {
                id: o.id,
                name: o.name,
            })
            .collect();

        Ok(OrganizationNavigation {
            organization_id: org.id,
            organization_name: org.name,
            user_role: ctx.role(),
            items: navigation_items(org.id, ctx.role(), current_path),
            organizations,
        })
    }
}
