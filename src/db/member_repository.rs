//! Organization membership repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_timestamp, parse_db_timestamp, parse_db_uuid};
use crate::models::{MemberRole, MemberWithUser, OrganizationMember, UserSummary};

#[derive(Debug, sqlx::FromRow)]
struct MemberUserRow {
    id: String,
    role: String,
    joined_at: String,
    user_id: String,
    user_name: Option<String>,
    user_email: String,
}

fn parse_role(value: &str) -> Result<MemberRole> {
    value.parse().map_err(anyhow::Error::msg)
}

pub struct MemberRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MemberRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Role of the user in the organization, or `None` without a membership row
    pub async fn find_role(&self, organization_id: Uuid, user_id: Uuid) -> Result<Option<MemberRole>> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT role FROM organization_members
            WHERE organization_id = ? AND user_id = ?
            "#,
        )
        .bind(organization_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to look up membership")?;

        row.map(|(role,)| parse_role(&role)).transpose()
    }

    /// Insert a membership row. Invitations are handled elsewhere; this is the
    /// storage primitive they build on.
    pub async fn add(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<OrganizationMember> {
        let id = Uuid::new_v4();
        let joined_at = format_timestamp(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO organization_members (id, user_id, organization_id, role, joined_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(organization_id.to_string())
        .bind(role.as_str())
        .bind(&joined_at)
        .execute(self.pool)
        .await
        .context("Failed to add organization member")?;

        Ok(OrganizationMember {
            id,
            user_id,
            organization_id,
            role,
            joined_at: parse_db_timestamp(&joined_at),
        })
    }

    /// Members with their public identity, earliest joiner first
    pub async fn list_with_users(&self, organization_id: Uuid) -> Result<Vec<MemberWithUser>> {
        let rows = sqlx::query_as::<_, MemberUserRow>(
            r#"
            SELECT m.id, m.role, m.joined_at,
                   u.id AS user_id, u.name AS user_name, u.email AS user_email
            FROM organization_members m
            INNER JOIN users u ON u.id = m.user_id
            WHERE m.organization_id = ?
            ORDER BY m.joined_at ASC, m.rowid ASC
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list organization members")?;

        rows.into_iter()
            .map(|row| {
                Ok(MemberWithUser {
                    id: parse_db_uuid(&row.id),
                    role: parse_role(&row.role)?,
                    joined_at: parse_db_timestamp(&row.joined_at),
                    user: UserSummary {
                        id: parse_db_uuid(&row.user_id),
                        name: row.user_name,
                        email: row.user_email,
                    },
                })
            })
            .collect()
    }

    pub async fn count(&self, organization_id: Uuid) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM organization_members WHERE organization_id = ?")
                .bind(organization_id.to_string())
                .fetch_one(self.pool)
                .await
                .context("Failed to count organization members")?;

        Ok(count)
    }

    /// Delete the membership row; returns false when there was none
    pub async fn delete(&self, organization_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM organization_members WHERE organization_id = ? AND user_id = ?",
        )
        .bind(organization_id.to_string())
        .bind(user_id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to remove organization member")?;

        Ok(result.rows_affected() > 0)
    }
}
