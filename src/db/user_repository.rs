//! User repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_timestamp, parse_db_timestamp, parse_db_uuid};
use crate::models::User;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: Option<String>,
    email: String,
    created_at: String,
}

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, created_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get user")?;

        Ok(row.map(row_to_user))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .context("Failed to get user by email")?;

        Ok(row.map(row_to_user))
    }

    /// Insert a user record. Normally done by the identity provider.
    pub async fn create(&self, name: Option<&str>, email: &str) -> Result<User> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(name)
            .bind(email)
            .bind(format_timestamp(Utc::now()))
            .execute(self.pool)
            .await
            .context("Failed to create user")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created user")
    }
}

fn row_to_user(row: UserRow) -> User {
    User {
        id: parse_db_uuid(&row.id),
        name: row.name,
        email: row.email,
        created_at: parse_db_timestamp(&row.created_at),
    }
}
