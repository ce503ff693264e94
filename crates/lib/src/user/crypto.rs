//! Password hashing for accounts
//!
//! Hashes are stored in PHC string format. The default implementation uses
//! Argon2id; verification also reports when a stored hash was produced with
//! parameters other than the current ones, so callers can rotate it.

use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core,
    },
};

use super::errors::UserError;
use crate::Result;

/// Outcome of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The password does not match.
    Fail,
    /// The password matches.
    Ok,
    /// The password matches, but the hash should be recomputed.
    NeedsRehash,
}

impl Verification {
    /// True for both matching outcomes.
    pub fn is_match(self) -> bool {
        !matches!(self, Verification::Fail)
    }
}

/// Creates and checks password hashes.
pub trait PasswordHasher: Send + Sync {
    /// Checks `plaintext` against a stored `hash`.
    ///
    /// Malformed hashes fail verification; they are never an error.
    fn verify(&self, plaintext: &str, hash: &str) -> Verification;

    /// Hashes `plaintext` with a fresh salt.
    fn create(&self, plaintext: &str) -> Result<String>;

    /// A valid hash that no caller knows the password of.
    ///
    /// Verified against when an account has no hash, so that a missing
    /// account costs as much time as a wrong password.
    fn dummy_hash(&self) -> String;
}

/// Argon2id hasher with configurable cost parameters.
#[derive(Debug)]
pub struct Argon2Hasher {
    params: Params,
    dummy: OnceLock<String>,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl Argon2Hasher {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            dummy: OnceLock::new(),
        }
    }

    /// Builds a hasher from memory cost (KiB), iterations and parallelism.
    pub fn with_cost(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params =
            Params::new(m_cost, t_cost, p_cost, None).map_err(|e| UserError::HashingFailed {
                reason: format!("Invalid Argon2 parameters: {e}"),
            })?;
        Ok(Self::new(params))
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// True if `hash` was not produced with this hasher's algorithm and
    /// parameters.
    fn is_outdated(&self, hash: &PasswordHash<'_>) -> bool {
        if hash.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        match Params::try_from(hash) {
            Ok(stored) => {
                stored.m_cost() != self.params.m_cost()
                    || stored.t_cost() != self.params.t_cost()
                    || stored.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn verify(&self, plaintext: &str, hash: &str) -> Verification {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return Verification::Fail;
        };
        // Parameters come from the stored hash, not from self.
        if Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_err()
        {
            return Verification::Fail;
        }
        if self.is_outdated(&parsed) {
            Verification::NeedsRehash
        } else {
            Verification::Ok
        }
    }

    fn create(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| UserError::HashingFailed {
                reason: e.to_string(),
            })?
            .to_string();
        Ok(hash)
    }

    fn dummy_hash(&self) -> String {
        self.dummy
            .get_or_init(|| {
                let salt = SaltString::generate(&mut rand_core::OsRng);
                self.argon2()
                    .hash_password(salt.as_str().as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .unwrap_or_default()
            })
            .clone()
    }
}
