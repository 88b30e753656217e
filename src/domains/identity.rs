use std::ops::Deref;

use secrecy::Secret;

/// Store-assigned account identifier.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for UserId {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A stored account. The hash is wrapped in `Secret` and the type is not
/// `Serialize`; callers only ever see a [`UserProfile`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub password_hash: Secret<String>,
}

impl Identity {
    pub fn sanitize(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// An account that has not been persisted yet.
#[derive(Debug)]
pub struct NewIdentity {
    pub username: String,
    pub password_hash: Secret<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
}
