//! Persistence of account identities.
//!
//! The credential service only needs point lookups and two single-row
//! writes, so the contract is kept small. Uniqueness of usernames and the
//! atomicity of password updates are the store's responsibility.

mod memory;
mod postgres;

use async_trait::async_trait;
use secrecy::Secret;

use crate::domains::{Identity, NewIdentity, UserId};

pub use memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("an identity with this username already exists")]
    AlreadyExists,
    #[error("identity not found")]
    NotFound,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::errors::error_chain_fmt(self, f)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError>;

    /// Persist a new identity. Fails with [`StoreError::AlreadyExists`] when
    /// the username is taken, including when a concurrent insert won the race.
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError>;

    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: Secret<String>,
    ) -> Result<(), StoreError>;

    async fn delete(&self, id: UserId) -> Result<(), StoreError>;
}
