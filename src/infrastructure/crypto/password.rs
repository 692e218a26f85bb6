//! Password hashing utilities

use bcrypt::hash_with_result;
use tracing::debug;

use super::legacy;
use crate::domain::{BcryptVersion, HashScheme};
use crate::shared::CryptoError;

/// Work factor used by the user database seed scripts
pub const DEFAULT_COST: u32 = 11;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hash a password using bcrypt with a fresh random salt
pub fn hash_password(password: &str, cost: u32) -> Result<String, CryptoError> {
    hash_password_with_version(password, cost, BcryptVersion::default())
}

/// Hash a password using bcrypt, writing the given version prefix
pub fn hash_password_with_version(
    password: &str,
    cost: u32,
    version: BcryptVersion,
) -> Result<String, CryptoError> {
    check_cost(cost)?;
    let parts = hash_with_result(password, cost)?;
    Ok(parts.format_for_version(version.into()))
}

/// Verify a password against a stored hash of any supported scheme
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CryptoError> {
    match HashScheme::detect(hash) {
        Some(HashScheme::Bcrypt) => Ok(bcrypt::verify(password, hash)?),
        Some(HashScheme::Sha256) => Ok(legacy::verify(password, hash)),
        None => Err(CryptoError::UnrecognizedHash(preview(hash))),
    }
}

pub fn check_cost(cost: u32) -> Result<(), CryptoError> {
    if (MIN_COST..=MAX_COST).contains(&cost) {
        Ok(())
    } else {
        Err(CryptoError::InvalidCost(cost))
    }
}

fn preview(hash: &str) -> String {
    const LEN: usize = 16;
    match hash.char_indices().nth(LEN) {
        Some((idx, _)) => format!("{}...", &hash[..idx]),
        None => hash.to_string(),
    }
}

/// Hashing policy: which scheme to emit and at what cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    pub scheme: HashScheme,
    pub cost: u32,
    pub version: BcryptVersion,
}

impl PasswordHasher {
    pub fn bcrypt(cost: u32) -> Self {
        Self {
            scheme: HashScheme::Bcrypt,
            cost,
            version: BcryptVersion::default(),
        }
    }

    pub fn with_scheme(mut self, scheme: HashScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_version(mut self, version: BcryptVersion) -> Self {
        self.version = version;
        self
    }

    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        debug!(scheme = %self.scheme, cost = self.cost, "Hashing password");
        match self.scheme {
            HashScheme::Bcrypt => hash_password_with_version(password, self.cost, self.version),
            HashScheme::Sha256 => Ok(legacy::sha256_hex(password)),
        }
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, CryptoError> {
        verify_password(password, hash)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::bcrypt(DEFAULT_COST)
    }
}
