use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use secrecy::Secret;

use super::{StoreError, UserStore};
use crate::domains::{Identity, NewIdentity, UserId};

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryUserStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    by_id: HashMap<UserId, Identity>,
    by_username: HashMap<String, UserId>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unexpected(anyhow::anyhow!("user store lock poisoned")))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    #[tracing::instrument(name = "Fetch user by username", skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .by_username
            .get(username)
            .and_then(|id| state.by_id.get(id))
            .cloned())
    }

    #[tracing::instrument(name = "Fetch user by id", skip(self))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        Ok(self.lock()?.by_id.get(&id).cloned())
    }

    #[tracing::instrument(name = "Insert user", skip(self, identity), fields(username = %identity.username))]
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let mut state = self.lock()?;
        if state.by_username.contains_key(&identity.username) {
            return Err(StoreError::AlreadyExists);
        }

        state.last_id += 1;
        let id = UserId::new(state.last_id);
        let stored = Identity {
            id,
            username: identity.username,
            password_hash: identity.password_hash,
        };
        state.by_username.insert(stored.username.clone(), id);
        state.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    #[tracing::instrument(name = "Update password hash", skip(self, password_hash))]
    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: Secret<String>,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let identity = state.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;
        identity.password_hash = password_hash;
        Ok(())
    }

    #[tracing::instrument(name = "Delete user", skip(self))]
    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let identity = state.by_id.remove(&id).ok_or(StoreError::NotFound)?;
        state.by_username.remove(&identity.username);
        Ok(())
    }
}
