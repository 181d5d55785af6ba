//! Organization (tenant) repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_timestamp, parse_db_timestamp, parse_db_uuid};
use crate::models::{
    CreateOrganizationRequest, MemberRole, Organization, OrganizationSummary, UserSummary,
};

#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: String,
    name: String,
    description: Option<String>,
    owner_id: String,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OrganizationSummaryRow {
    id: String,
    name: String,
    description: Option<String>,
    created_at: String,
    updated_at: String,
    member_count: i64,
    user_role: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OrganizationOwnerRow {
    #[sqlx(flatten)]
    organization: OrganizationRow,
    owner_name: Option<String>,
    owner_email: String,
    member_count: i64,
}

/// Organization together with its owner's identity and member count
#[derive(Debug, Clone)]
pub struct OrganizationWithOwner {
    pub organization: Organization,
    pub owner: UserSummary,
    pub member_count: i64,
}

pub struct OrganizationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrganizationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM organizations
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get organization")?;

        Ok(row.map(row_to_org))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM organizations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await
            .context("Failed to check organization existence")?;

        Ok(found.is_some())
    }

    /// Insert the organization and the owner's ADMIN membership in one transaction
    pub async fn create_with_owner(
        &self,
        owner_id: Uuid,
        req: &CreateOrganizationRequest,
    ) -> Result<Organization> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let now_str = format_timestamp(now);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin organization transaction")?;

        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, description, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(&req.description)
        .bind(owner_id.to_string())
        .bind(&now_str)
        .bind(&now_str)
        .execute(&mut *tx)
        .await
        .context("Failed to create organization")?;

        sqlx::query(
            r#"
            INSERT INTO organization_members (id, user_id, organization_id, role, joined_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(owner_id.to_string())
        .bind(id.to_string())
        .bind(MemberRole::Admin.as_str())
        .bind(&now_str)
        .execute(&mut *tx)
        .await
        .context("Failed to add owner membership")?;

        tx.commit()
            .await
            .context("Failed to commit organization transaction")?;

        Ok(Organization {
            id,
            name: req.name.clone(),
            description: req.description.clone(),
            owner_id,
            created_at: parse_db_timestamp(&now_str),
            updated_at: parse_db_timestamp(&now_str),
        })
    }

    /// Organizations the user belongs to, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrganizationSummary>> {
        let rows = sqlx::query_as::<_, OrganizationSummaryRow>(
            r#"
            SELECT o.id, o.name, o.description, o.created_at, o.updated_at,
                   m.role AS user_role,
                   (SELECT COUNT(*) FROM organization_members c
                    WHERE c.organization_id = o.id) AS member_count
            FROM organizations o
            INNER JOIN organization_members m
                ON m.organization_id = o.id AND m.user_id = ?
            ORDER BY o.created_at DESC, o.rowid DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list organizations for user")?;

        rows.into_iter()
            .map(|row| {
                Ok(OrganizationSummary {
                    id: parse_db_uuid(&row.id),
                    name: row.name,
                    description: row.description,
                    created_at: parse_db_timestamp(&row.created_at),
                    updated_at: parse_db_timestamp(&row.updated_at),
                    member_count: row.member_count,
                    user_role: row.user_role.parse().map_err(anyhow::Error::msg)?,
                })
            })
            .collect()
    }

    pub async fn get_with_owner(&self, id: Uuid) -> Result<Option<OrganizationWithOwner>> {
        let row = sqlx::query_as::<_, OrganizationOwnerRow>(
            r#"
            SELECT o.id, o.name, o.description, o.owner_id, o.created_at, o.updated_at,
                   u.name AS owner_name, u.email AS owner_email,
                   (SELECT COUNT(*) FROM organization_members c
                    WHERE c.organization_id = o.id) AS member_count
            FROM organizations o
            INNER JOIN users u ON u.id = o.owner_id
            WHERE o.id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get organization details")?;

        Ok(row.map(|row| {
            let organization = row_to_org(row.organization);
            OrganizationWithOwner {
                owner: UserSummary {
                    id: organization.owner_id,
                    name: row.owner_name,
                    email: row.owner_email,
                },
                organization,
                member_count: row.member_count,
            }
        }))
    }
}

fn row_to_org(row: OrganizationRow) -> Organization {
    Organization {
        id: parse_db_uuid(&row.id),
        name: row.name,
        description: row.description,
        owner_id: parse_db_uuid(&row.owner_id),
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
