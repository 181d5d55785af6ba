//! Organization access control
//!
//! Resolves a caller's membership in an organization and turns it into a
//! guarded context. The role is read from the store on every call and never
//! cached, so a role change is visible on the very next request.
//!
//! Two guards exist:
//! - [`AccessResolver::require_member`] → [`MemberContext`], fails with
//!   access-denied when the caller has no membership row.
//! - [`AccessResolver::require_admin`] → [`AdminContext`], fails with
//!   permission-denied unless the caller's role is ADMIN.
//!
//! Both report not-found when the organization does not exist at all.

use std::ops::Deref;

use uuid::Uuid;

use crate::{
    db::{DbPool, MemberRepository, OrganizationRepository},
    models::MemberRole,
    utils::{AppError, AppResult},
};

/// Proof that `user_id` holds a membership row in `organization_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberContext {
    organization_id: Uuid,
    user_id: Uuid,
    role: MemberRole,
}

impl MemberContext {
    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }
}

/// A [`MemberContext`] whose role is ADMIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext(MemberContext);

impl Deref for AdminContext {
    type Target = MemberContext;

    fn deref(&self) -> &MemberContext {
        &self.0
    }
}

pub struct AccessResolver<'a> {
    pool: &'a DbPool,
}

impl<'a> AccessResolver<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Membership role of the user, `None` when there is no membership row
    pub async fn resolve(&self, organization_id: Uuid, user_id: Uuid) -> AppResult<Option<MemberRole>> {
        MemberRepository::new(self.pool)
            .find_role(organization_id, user_id)
            .await
            .map_err(|e| AppError::store("resolve membership", e))
    }

    pub async fn require_member(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<MemberContext> {
        self.ensure_exists(organization_id).await?;

        match self.resolve(organization_id, user_id).await? {
            Some(role) => Ok(MemberContext {
                organization_id,
                user_id,
                role,
            }),
            None => {
                tracing::debug!(%organization_id, %user_id, "Caller is not a member");
                Err(AppError::access_denied(
                    "You are not a member of this organization",
                ))
            }
        }
    }

    pub async fn require_admin(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<AdminContext> {
        self.ensure_exists(organization_id).await?;

        match self.resolve(organization_id, user_id).await? {
            Some(MemberRole::Admin) => Ok(AdminContext(MemberContext {
                organization_id,
                user_id,
                role: MemberRole::Admin,
            })),
            role => {
                tracing::debug!(%organization_id, %user_id, ?role, "Caller is not an admin");
                Err(AppError::permission_denied(
                    "Admin access required for this operation",
                ))
            }
        }
    }

    async fn ensure_exists(&self, organization_id: Uuid) -> AppResult<()> {
        let exists = OrganizationRepository::new(self.pool)
            .exists(organization_id)
            .await
            .map_err(|e| AppError::store("look up organization", e))?;

        if exists {
            Ok(())
        } else {
            Err(AppError::not_found("Organization not found"))
        }
    }
}
