use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};
use secrecy::{ExposeSecret, Secret};

use crate::configuration::HashingSettings;

/// Salted Argon2id hashing. Hashes are PHC strings, so the cost parameters
/// travel with each hash and verification needs no configuration.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: Params,
    // Hash of a random throwaway password at the configured cost. Verified
    // against when there is no real hash, so a missing user or a corrupt
    // hash costs as much as a wrong password.
    fallback_hash: Secret<String>,
}

impl PasswordHasher {
    pub fn new(settings: &HashingSettings) -> Result<Self, anyhow::Error> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid argon2 parameters {:?}: {}", settings, e))?;

        let mut hasher = Self {
            params,
            fallback_hash: Secret::new(String::new()),
        };
        let throwaway = SaltString::generate(&mut rand::thread_rng());
        hasher.fallback_hash = hasher
            .hash(&Secret::new(throwaway.as_str().to_owned()))
            .context("Failed to compute the fallback password hash")?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &Secret<String>) -> Result<Secret<String>, anyhow::Error> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let password_hash = self
            .argon2()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Failed to hash password")?
            .to_string();
        Ok(Secret::new(password_hash))
    }

    /// `true` only when `candidate` matches `expected_hash`. A hash that
    /// cannot be parsed is a mismatch, never an error.
    pub fn verify(&self, expected_hash: &Secret<String>, candidate: &Secret<String>) -> bool {
        match PasswordHash::new(expected_hash.expose_secret()) {
            Ok(expected_hash) => self.check(&expected_hash, candidate),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                self.simulate_verification(candidate);
                false
            }
        }
    }

    /// Run one verification at the configured cost and discard the result.
    pub fn simulate_verification(&self, candidate: &Secret<String>) {
        if let Ok(fallback) = PasswordHash::new(self.fallback_hash.expose_secret()) {
            let _ = self.check(&fallback, candidate);
        }
    }

    fn check(&self, expected_hash: &PasswordHash<'_>, candidate: &Secret<String>) -> bool {
        tracing::info_span!("Verify password hash").in_scope(|| {
            self.argon2()
                .verify_password(candidate.expose_secret().as_bytes(), expected_hash)
                .is_ok()
        })
    }
}
