use std::sync::Arc;

use anyhow::Context;
use secrecy::{ExposeSecret, Secret};

use super::password::PasswordHasher;
use crate::domains::{Identity, NewIdentity, UserId, UserProfile, Username};
use crate::errors::AccountError;
use crate::store::UserStore;
use crate::telemetry::spawn_blocking_with_tracing;

pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

/// Register, log in and change passwords against a [`UserStore`].
pub struct CredentialService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    #[tracing::instrument(
        name = "Register user",
        skip(self, credentials),
        fields(username = %credentials.username, user_id = tracing::field::Empty)
    )]
    pub async fn register(&self, credentials: Credentials) -> Result<Identity, AccountError> {
        let username =
            Username::parse(credentials.username).map_err(AccountError::InvalidCredentials)?;
        if credentials.password.expose_secret().is_empty() {
            return Err(AccountError::InvalidCredentials(
                "username or password is empty".into(),
            ));
        }

        // The store's unique constraint is the real guard; this only skips
        // the hashing cost for the common case.
        if self.store.find_by_username(username.as_ref()).await?.is_some() {
            tracing::info!("User already exists");
            return Err(AccountError::UserAlreadyExists);
        }

        let password_hash = self.hash(credentials.password).await?;
        let identity = self
            .store
            .create(NewIdentity {
                username: username.into_inner(),
                password_hash,
            })
            .await?;

        tracing::Span::current().record("user_id", &tracing::field::display(&identity.id));
        Ok(identity)
    }

    /// Unknown usernames fail with `UserNotFound`, wrong passwords with
    /// `AuthFailed`. Both paths run one hash verification.
    #[tracing::instrument(
        name = "Validating credentials",
        skip(self, credentials),
        fields(username = %credentials.username, user_id = tracing::field::Empty)
    )]
    pub async fn login(&self, credentials: Credentials) -> Result<Identity, AccountError> {
        let identity = self.store.find_by_username(&credentials.username).await?;

        let Some(identity) = identity else {
            let hasher = self.hasher.clone();
            spawn_blocking_with_tracing(move || {
                hasher.simulate_verification(&credentials.password)
            })
            .await
            .context("Failed to spawn blocking task")?;
            return Err(AccountError::UserNotFound);
        };

        self.verify(&identity.password_hash, credentials.password).await?;

        tracing::Span::current().record("user_id", &tracing::field::display(&identity.id));
        Ok(identity)
    }

    #[tracing::instrument(name = "Change user password", skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        id: UserId,
        old_password: Secret<String>,
        new_password: Secret<String>,
    ) -> Result<(), AccountError> {
        if new_password.expose_secret().is_empty() {
            return Err(AccountError::InvalidCredentials("new password is empty".into()));
        }

        let identity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        self.verify(&identity.password_hash, old_password).await?;

        let password_hash = self.hash(new_password).await?;
        self.store.update_password_hash(id, password_hash).await?;
        Ok(())
    }

    /// Profile of an authenticated caller, looked up by the username the token
    /// carries. The stored id must still match: a username re-registered after
    /// a deletion does not resolve for tokens issued to the old account.
    #[tracing::instrument(name = "Fetch user profile", skip(self))]
    pub async fn profile(&self, id: UserId, username: &str) -> Result<UserProfile, AccountError> {
        let profile = self.profile_by_username(username).await?;
        if profile.id != id {
            tracing::info!(current_id = %profile.id, "Username now belongs to another account");
            return Err(AccountError::UserNotFound);
        }
        Ok(profile)
    }

    async fn profile_by_username(&self, username: &str) -> Result<UserProfile, AccountError> {
        self.store
            .find_by_username(username)
            .await?
            .map(|identity| identity.sanitize())
            .ok_or(AccountError::UserNotFound)
    }

    #[tracing::instrument(name = "Delete user account", skip(self))]
    pub async fn delete_account(&self, id: UserId) -> Result<(), AccountError> {
        self.store.delete(id).await?;
        Ok(())
    }

    async fn hash(&self, password: Secret<String>) -> Result<Secret<String>, AccountError> {
        let hasher = self.hasher.clone();
        let password_hash = spawn_blocking_with_tracing(move || hasher.hash(&password))
            .await
            .context("Failed to spawn blocking task")??;
        Ok(password_hash)
    }

    async fn verify(
        &self,
        expected_hash: &Secret<String>,
        candidate: Secret<String>,
    ) -> Result<(), AccountError> {
        let hasher = self.hasher.clone();
        let expected_hash = expected_hash.clone();
        let matches =
            spawn_blocking_with_tracing(move || hasher.verify(&expected_hash, &candidate))
                .await
                .context("Failed to spawn blocking task")?;

        if matches {
            Ok(())
        } else {
            Err(AccountError::AuthFailed(anyhow::anyhow!("Invalid password")))
        }
    }
}
