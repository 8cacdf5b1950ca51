/*
 * Responsibility
 * - read-only SQLx lookup against the users table
 * - holds the PgPool; pooling and connection errors stay here
 * - the email is matched exactly (callers normalize before resolving)
 */
use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::auth::principal::{Authority, UserId, UserRecord};
use crate::services::auth::provider::UserRecordProvider;

#[derive(FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub email: String,
    #[sqlx(rename = "passwordHash")]
    pub password_hash: String,
    pub enabled: bool,
    pub locked: bool,
    pub roles: Vec<String>,
}

// Same redaction as UserRecord: rows are returned by a pub fn and may be logged.
impl fmt::Debug for UserRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("enabled", &self.enabled)
            .field("locked", &self.locked)
            .field("roles", &self.roles)
            .finish()
    }
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id.to_string()),
            email: row.email,
            password_hash: row.password_hash,
            authorities: row.roles.into_iter().map(Authority::new).collect::<BTreeSet<_>>(),
            enabled: row.enabled,
            locked: row.locked,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", email, "passwordHash", enabled, locked, roles
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::Db)?;

        Ok(row)
    }
}

#[async_trait]
impl UserRecordProvider for PgUserRepo {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<UserRecord>> {
        let row = self.find_by_email(identifier).await?;
        Ok(row.map(UserRecord::from))
    }
}
