//! Credential records fed to the hash generator

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::shared::ConfigError;

/// Username and plaintext password pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse a `username=password` (or `username:password`) argument.
    pub fn parse_pair(pair: &str) -> Result<Self, ConfigError> {
        let (username, password) = pair
            .split_once('=')
            .or_else(|| pair.split_once(':'))
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "expected username=password, got '{}'",
                    pair
                ))
            })?;
        Ok(Self::new(username.trim(), password))
    }
}

/// Ordered list of credentials with unique, non-empty usernames.
///
/// Order is the order users are printed and updated in the SQL script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialSet {
    entries: Vec<Credential>,
}

impl CredentialSet {
    pub fn new(entries: Vec<Credential>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.username.is_empty() {
                return Err(ConfigError::Validation("username must not be empty".into()));
            }
            if !seen.insert(entry.username.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate username '{}'",
                    entry.username
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Credential> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a CredentialSet {
    type Item = &'a Credential;
    type IntoIter = std::slice::Iter<'a, Credential>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Hash generated for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHash {
    pub username: String,
    pub hash: String,
}
