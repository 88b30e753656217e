use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;

use super::{StoreError, UserStore};
use crate::domains::{Identity, NewIdentity, UserId};

const UNIQUE_VIOLATION: &str = "23505";

pub struct PostgresUserStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Identity {
            id: UserId::new(row.id),
            username: row.username,
            password_hash: Secret::new(row.password_hash),
        }
    }
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Running database migrations", skip(self))]
    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to migrate the database")
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Fetch user by username", skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, username, password_hash FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to retrieve user by username")?
        .map(Identity::from);
        Ok(user)
    }

    #[tracing::instrument(name = "Fetch user by id", skip(self))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, username, password_hash FROM users WHERE id = $1"#,
        )
        .bind(*id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to retrieve user by id")?
        .map(Identity::from);
        Ok(user)
    }

    #[tracing::instrument(name = "Insert user", skip(self, identity), fields(username = %identity.username))]
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"INSERT INTO users (username, password_hash)
    VALUES ($1, $2)
    RETURNING id, username, password_hash"#,
        )
        .bind(identity.username.as_str())
        .bind(identity.password_hash.expose_secret().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::AlreadyExists
            } else {
                StoreError::Unexpected(anyhow::Error::new(e).context("Failed to insert user"))
            }
        })?;
        Ok(row.into())
    }

    #[tracing::instrument(name = "Update password hash", skip(self, password_hash))]
    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: Secret<String>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"UPDATE users
    SET password_hash = $1
    WHERE id = $2"#,
        )
        .bind(password_hash.expose_secret().as_str())
        .bind(*id)
        .execute(&self.pool)
        .await
        .context("Failed to change user's password")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Delete user", skip(self))]
    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(*id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
