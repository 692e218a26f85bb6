//! Configuration module
//!
//! Reads a TOML file (`~/.config/awe-credentials/config.toml` by default).
//! Every section is optional; missing values fall back to the sample
//! database's seed values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::SqlScript;
use crate::domain::{BcryptVersion, Credential, CredentialSet, HashScheme};
use crate::infrastructure::crypto::password::{check_cost, PasswordHasher, DEFAULT_COST};
use crate::shared::ConfigError;

/// Hash stored for `admin` in the sample database that the cracker targets by default
pub const DEFAULT_STORED_HASH: &str =
    "$2a$11$xmUVpf71/YynudMDR1VdauOOuBI.bKjUhfK5LDmxjKRs4Ps2kEgHS";

const DEFAULT_WORDLIST: &[&str] = &[
    "admin",
    "admin123",
    "Admin123",
    "password",
    "Password123",
    "YourStrong@Password123",
    "Admin",
    "Administrator",
    "123456",
    "awe123",
    "AWE123",
    "password123",
    "AWEElectronics",
    "default",
    "test",
    "test123",
];

const DEFAULT_USERS: &[(&str, &str)] = &[
    ("admin", "admin123"),
    ("jsmith", "staff123"),
    ("mjones", "staff123"),
    ("bwilson", "agent123"),
    ("slee", "staff123"),
];

/// Path of the config file when none is given on the command line.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("awe-credentials")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub hashing: HashingConfig,
    pub generator: GeneratorConfig,
    pub cracker: CrackerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// bcrypt work factor
    pub cost: u32,
    pub bcrypt_version: BcryptVersion,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_COST,
            bcrypt_version: BcryptVersion::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub scheme: HashScheme,
    pub output: PathBuf,
    pub database: String,
    /// Append the plaintext login table to the script
    pub print_credentials: bool,
    pub users: Vec<Credential>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scheme: HashScheme::Bcrypt,
            output: PathBuf::from("UPDATE_USER_PASSWORDS.sql"),
            database: "AWEElectronics_DB".to_string(),
            print_credentials: true,
            users: DEFAULT_USERS
                .iter()
                .map(|(user, pass)| Credential::new(*user, *pass))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrackerConfig {
    pub stored_hash: String,
    /// Hashed and printed when no candidate matches
    pub fallback_password: String,
    pub wordlist: Vec<String>,
}

impl Default for CrackerConfig {
    fn default() -> Self {
        Self {
            stored_hash: DEFAULT_STORED_HASH.to_string(),
            fallback_password: "admin123".to_string(),
            wordlist: DEFAULT_WORDLIST.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    ///
    /// Returns whether the file was found alongside the config.
    pub fn load_or_default(path: &Path) -> Result<(Self, bool), ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok((Self::from_toml(&text)?, true)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok((Self::default(), false)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_cost(self.hashing.cost).map_err(|e| ConfigError::Validation(e.to_string()))?;

        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "unknown logging format '{}', expected 'pretty' or 'json'",
                    other
                )))
            }
        }

        self.credentials()?;
        Ok(())
    }

    pub fn credentials(&self) -> Result<CredentialSet, ConfigError> {
        CredentialSet::new(self.generator.users.clone())
    }

    pub fn hasher(&self) -> PasswordHasher {
        PasswordHasher::bcrypt(self.hashing.cost)
            .with_version(self.hashing.bcrypt_version)
            .with_scheme(self.generator.scheme)
    }

    pub fn sql_layout(&self) -> SqlScript {
        SqlScript {
            database: self.generator.database.clone(),
            scheme: self.generator.scheme,
            print_credentials: self.generator.print_credentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_seed_values() {
        let config = AppConfig::default();
        assert_eq!(config.hashing.cost, 11);
        assert_eq!(config.generator.users.len(), 5);
        assert_eq!(config.generator.users[0], Credential::new("admin", "admin123"));
        assert_eq!(config.generator.users[3], Credential::new("bwilson", "agent123"));
        assert_eq!(config.cracker.wordlist.len(), 16);
        assert_eq!(config.cracker.wordlist[1], "admin123");
        assert_eq!(config.cracker.fallback_password, "admin123");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [hashing]
            cost = 12

            [cracker]
            wordlist = ["letmein"]
            "#,
        )
        .unwrap();

        assert_eq!(config.hashing.cost, 12);
        assert_eq!(config.hashing.bcrypt_version, BcryptVersion::TwoB);
        assert_eq!(config.cracker.wordlist, vec!["letmein".to_string()]);
        assert_eq!(config.cracker.stored_hash, DEFAULT_STORED_HASH);
        assert_eq!(config.generator.database, "AWEElectronics_DB");
    }

    #[test]
    fn test_full_generator_section() {
        let config = AppConfig::from_toml(
            r#"
            [hashing]
            bcrypt_version = "2a"

            [generator]
            scheme = "sha256"
            output = "out/seed.sql"
            database = "ShopTest"
            print_credentials = false
            users = [
                { username = "ops", password = "hunter2" },
                { username = "audit", password = "s3cret" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.hashing.bcrypt_version, BcryptVersion::TwoA);
        assert_eq!(config.generator.scheme, HashScheme::Sha256);
        assert_eq!(config.generator.output, PathBuf::from("out/seed.sql"));
        assert!(!config.generator.print_credentials);
        assert_eq!(config.credentials().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_out_of_range_cost() {
        let err = AppConfig::from_toml("[hashing]\ncost = 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_duplicate_users() {
        let err = AppConfig::from_toml(
            r#"
            [generator]
            users = [
                { username = "admin", password = "a" },
                { username = "admin", password = "b" },
            ]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate username"));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        assert!(AppConfig::from_toml("[logging]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[hashing\ncost = 11"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (config, found) = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert!(!found);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let (config, found) = AppConfig::load_or_default(&path).unwrap();
        assert!(found);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }
}
