//! Password hash schemes understood by the tools

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hashing scheme of a stored password hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashScheme {
    /// Salted adaptive bcrypt hash (`$2b$11$...`)
    #[default]
    Bcrypt,
    /// Unsalted lowercase hex SHA-256 digest, used by the application before bcrypt
    Sha256,
}

impl HashScheme {
    /// Detect the scheme from the text of a stored hash.
    pub fn detect(hash: &str) -> Option<Self> {
        if BcryptVersion::from_hash(hash).is_some() {
            return Some(HashScheme::Bcrypt);
        }
        if hash.len() == 64 && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Some(HashScheme::Sha256);
        }
        None
    }
}

impl fmt::Display for HashScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashScheme::Bcrypt => write!(f, "bcrypt"),
            HashScheme::Sha256 => write!(f, "sha256"),
        }
    }
}

/// bcrypt version prefix written into generated hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BcryptVersion {
    #[serde(rename = "2a")]
    TwoA,
    #[default]
    #[serde(rename = "2b")]
    TwoB,
    #[serde(rename = "2x")]
    TwoX,
    #[serde(rename = "2y")]
    TwoY,
}

impl BcryptVersion {
    pub fn prefix(&self) -> &'static str {
        match self {
            BcryptVersion::TwoA => "$2a$",
            BcryptVersion::TwoB => "$2b$",
            BcryptVersion::TwoX => "$2x$",
            BcryptVersion::TwoY => "$2y$",
        }
    }

    pub fn from_hash(hash: &str) -> Option<Self> {
        [
            BcryptVersion::TwoA,
            BcryptVersion::TwoB,
            BcryptVersion::TwoX,
            BcryptVersion::TwoY,
        ]
        .into_iter()
        .find(|v| hash.starts_with(v.prefix()))
    }
}

impl From<BcryptVersion> for bcrypt::Version {
    fn from(version: BcryptVersion) -> Self {
        match version {
            BcryptVersion::TwoA => bcrypt::Version::TwoA,
            BcryptVersion::TwoB => bcrypt::Version::TwoB,
            BcryptVersion::TwoX => bcrypt::Version::TwoX,
            BcryptVersion::TwoY => bcrypt::Version::TwoY,
        }
    }
}
