//! Hash generator: hashes every credential and renders the SQL update script

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use super::sql_script::SqlScript;
use crate::domain::{CredentialSet, UserHash};
use crate::infrastructure::crypto::PasswordHasher;
use crate::shared::{AppError, AppResult, CryptoError};

/// Hashes and script produced by one generator run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub hashes: Vec<UserHash>,
    pub script: String,
}

pub struct HashGenerator {
    hasher: PasswordHasher,
    layout: SqlScript,
}

impl HashGenerator {
    pub fn new(hasher: PasswordHasher, layout: SqlScript) -> Self {
        Self { hasher, layout }
    }

    /// Hash each password with its own fresh salt, in credential order.
    pub fn hash_all(&self, credentials: &CredentialSet) -> Result<Vec<UserHash>, CryptoError> {
        credentials
            .iter()
            .map(|cred| {
                let hash = self.hasher.hash(&cred.password)?;
                debug!(username = %cred.username, "Generated hash");
                Ok(UserHash {
                    username: cred.username.clone(),
                    hash,
                })
            })
            .collect()
    }

    pub fn generate(&self, credentials: &CredentialSet) -> AppResult<Generation> {
        info!(
            users = credentials.len(),
            scheme = %self.hasher.scheme,
            cost = self.hasher.cost,
            "Generating password hashes"
        );
        let hashes = self.hash_all(credentials)?;
        let script = self.layout.render(credentials, &hashes)?;
        Ok(Generation { hashes, script })
    }
}

impl Generation {
    /// Print the `user -> password -> hash` table followed by the script.
    pub fn write_report<W: Write>(
        &self,
        credentials: &CredentialSet,
        out: &mut W,
    ) -> std::io::Result<()> {
        let rule = "=".repeat(60);
        for (cred, entry) in credentials.iter().zip(&self.hashes) {
            writeln!(
                out,
                "{:10} -> password: {:12} -> hash: {}",
                cred.username, cred.password, entry.hash
            )?;
        }
        writeln!(out)?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "SQL UPDATE Script")?;
        writeln!(out, "{}", rule)?;
        writeln!(out)?;
        writeln!(out, "{}", self.script)?;
        Ok(())
    }
}

/// Write the script to `path`, replacing any existing file.
pub fn write_script(path: &Path, script: &str) -> AppResult<()> {
    if path.exists() {
        info!(path = %path.display(), "Overwriting existing script");
    }
    std::fs::write(path, script).map_err(|e| AppError::io(path, e))?;
    info!(path = %path.display(), bytes = script.len(), "SQL script written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Credential, HashScheme};
    use crate::infrastructure::crypto::verify_password;
    use crate::shared::RenderError;

    fn generator() -> HashGenerator {
        HashGenerator::new(PasswordHasher::bcrypt(4), SqlScript::default())
    }

    fn admins() -> CredentialSet {
        CredentialSet::new(vec![
            Credential::new("admin", "admin123"),
            Credential::new("jsmith", "staff123"),
            Credential::new("mjones", "staff123"),
        ])
        .unwrap()
    }

    #[test]
    fn test_hash_all_verifies_and_uses_fresh_salts() {
        let hashes = generator().hash_all(&admins()).unwrap();

        assert_eq!(hashes.len(), 3);
        assert_eq!(hashes[1].username, "jsmith");
        assert!(verify_password("admin123", &hashes[0].hash).unwrap());
        assert!(verify_password("staff123", &hashes[1].hash).unwrap());
        assert!(verify_password("staff123", &hashes[2].hash).unwrap());
        // Same password, different salt
        assert_ne!(hashes[1].hash, hashes[2].hash);
    }

    #[test]
    fn test_generate_embeds_hashes() {
        let generation = generator().generate(&admins()).unwrap();
        for entry in &generation.hashes {
            assert!(generation.script.contains(&format!(
                "PasswordHash = '{}' WHERE Username = '{}';",
                entry.hash, entry.username
            )));
        }
    }

    #[test]
    fn test_generate_sha256() {
        let generator = HashGenerator::new(
            PasswordHasher::bcrypt(4).with_scheme(HashScheme::Sha256),
            SqlScript::default(),
        );
        let creds = CredentialSet::new(vec![Credential::new("admin", "admin123")]).unwrap();
        let generation = generator.generate(&creds).unwrap();
        assert!(generation.script.contains(
            "PasswordHash = '240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9'"
        ));
    }

    #[test]
    fn test_invalid_cost_is_fatal() {
        let generator = HashGenerator::new(PasswordHasher::bcrypt(2), SqlScript::default());
        let err = generator.generate(&admins()).unwrap_err();
        assert!(matches!(err, AppError::Crypto(CryptoError::InvalidCost(2))));
    }

    #[test]
    fn test_report_lists_users_in_order() {
        let creds = admins();
        let generation = Generation {
            hashes: ["H0", "H1", "H2"]
                .iter()
                .zip(creds.iter())
                .map(|(h, c)| UserHash {
                    username: c.username.clone(),
                    hash: h.to_string(),
                })
                .collect(),
            script: "GO\n".into(),
        };

        let mut out = Vec::new();
        generation.write_report(&creds, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let first = text.lines().next().unwrap();
        assert_eq!(first, "admin      -> password: admin123     -> hash: H0");
        assert!(text.find("jsmith").unwrap() < text.find("mjones").unwrap());
        assert!(text.contains("SQL UPDATE Script"));
    }

    #[test]
    fn test_write_script_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UPDATE_USER_PASSWORDS.sql");
        std::fs::write(&path, "old contents").unwrap();

        write_script(&path, "USE AWEElectronics_DB;\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "USE AWEElectronics_DB;\n"
        );
    }

    #[test]
    fn test_write_script_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.sql");
        let err = write_script(&path, "x").unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
        assert!(err.to_string().contains("out.sql"));
    }

    #[test]
    fn test_render_error_surfaces() {
        let err: AppError = RenderError::MissingHash("slee".into()).into();
        assert_eq!(err.to_string(), "No hash was generated for user 'slee'");
    }
}
