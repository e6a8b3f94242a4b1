//! Argon2id password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

/// Hashes with cost parameters taken from configuration
#[derive(Clone)]
pub struct PasswordHasherService {
    params: Params,
    /// Verified against when there is no stored hash, so a missing account
    /// costs the same as a wrong password
    dummy_hash: String,
    #[cfg(test)]
    verifications: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl PasswordHasherService {
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Invalid argon2 parameters: {}", e)))?;
        let mut service = Self {
            params,
            dummy_hash: String::new(),
            #[cfg(test)]
            verifications: Default::default(),
        };
        service.dummy_hash = service.hash("maintrack-absent-account")?;
        Ok(service)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password using Argon2id
    pub fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string.
    /// Parameters embedded in the hash win over the configured ones.
    pub fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        #[cfg(test)]
        self.verifications
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Run a full verification against the dummy hash and discard the result
    pub fn verify_absent(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }

    #[cfg(test)]
    pub(crate) fn verifications(&self) -> usize {
        self.verifications.load(std::sync::atomic::Ordering::SeqCst)
    }
}
