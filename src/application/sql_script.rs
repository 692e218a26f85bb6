//! SQL update script rendering
//!
//! Produces a T-SQL script that sets `Users.PasswordHash` for every
//! credential, prints progress messages and finishes with a verification
//! `SELECT`. String literals are escaped by doubling single quotes; any value
//! that needed escaping is reported with a warning.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::warn;

use crate::domain::{Credential, CredentialSet, HashScheme, UserHash};
use crate::shared::RenderError;

const RULE: &str = "====================================================";

/// Script layout options.
#[derive(Debug, Clone)]
pub struct SqlScript {
    pub database: String,
    pub scheme: HashScheme,
    /// Emit the plaintext login table at the end of the script
    pub print_credentials: bool,
}

impl Default for SqlScript {
    fn default() -> Self {
        Self {
            database: "AWEElectronics_DB".to_string(),
            scheme: HashScheme::Bcrypt,
            print_credentials: true,
        }
    }
}

struct Row<'a> {
    user: Cow<'a, str>,
    user_comment: Cow<'a, str>,
    password: Cow<'a, str>,
    password_comment: Cow<'a, str>,
    hash: Cow<'a, str>,
    width: usize,
}

impl SqlScript {
    /// Render the script. Every credential must have exactly one hash.
    pub fn render(
        &self,
        credentials: &CredentialSet,
        hashes: &[UserHash],
    ) -> Result<String, RenderError> {
        let pairs = pair_hashes(credentials, hashes)?;
        let rows: Vec<Row<'_>> = pairs
            .into_iter()
            .map(|(cred, hash)| {
                let user = literal(&cred.username, "username", &cred.username);
                // Padding follows the printed (escaped) name
                let width = user.chars().count();
                Row {
                    user,
                    user_comment: comment(&cred.username, "username", &cred.username),
                    password: literal(&cred.password, "password", &cred.username),
                    password_comment: comment(&cred.password, "password", &cred.username),
                    hash: literal(hash, "hash", &cred.username),
                    width,
                }
            })
            .collect();

        let scheme_label = match self.scheme {
            HashScheme::Bcrypt => "BCrypt",
            HashScheme::Sha256 => "SHA-256",
        };

        let mut lines: Vec<String> = vec![
            format!("USE {};", identifier(&self.database)),
            "GO".into(),
            String::new(),
            format!("PRINT 'Updating user passwords with {} hashes...';", scheme_label),
            "PRINT '';".into(),
            String::new(),
        ];

        for row in &rows {
            lines.push(format!(
                "-- Update {} (password: {})",
                row.user_comment, row.password_comment
            ));
            lines.push(format!(
                "UPDATE Users SET PasswordHash = '{}' WHERE Username = '{}';",
                row.hash, row.user
            ));
            lines.push(format!("PRINT 'Updated {} password';", row.user));
            lines.push(String::new());
        }

        lines.extend(
            [
                "PRINT '';",
                "PRINT 'All passwords updated successfully!';",
                "PRINT '';",
                "",
                "-- Verify updates",
                "PRINT 'Current users:';",
                "SELECT",
                "    UserID as ID,",
                "    Username,",
                "    FullName as [Full Name],",
                "    Role,",
                "    Status,",
                "    LEFT(PasswordHash, 30) + '...' as [Hash Preview]",
                "FROM Users",
                "ORDER BY UserID;",
                "",
            ]
            .map(String::from),
        );

        if self.print_credentials {
            let width = rows.iter().map(|r| r.width).max().unwrap_or(0).max(8);
            lines.push("PRINT '';".into());
            lines.push(format!("PRINT '{}';", RULE));
            lines.push("PRINT 'LOGIN CREDENTIALS:';".into());
            lines.push(format!("PRINT '{}';", RULE));
            for row in &rows {
                let pad = " ".repeat(width - row.width);
                lines.push(format!(
                    "PRINT '{}{} -> password: {}';",
                    row.user, pad, row.password
                ));
            }
            lines.push(format!("PRINT '{}';", RULE));
        }
        lines.push("GO".into());

        let mut script = lines.join("\n");
        script.push('\n');
        Ok(script)
    }
}

/// Match credentials to hashes, consuming each hash exactly once.
fn pair_hashes<'a>(
    credentials: &'a CredentialSet,
    hashes: &'a [UserHash],
) -> Result<Vec<(&'a Credential, &'a str)>, RenderError> {
    let mut by_user: HashMap<&str, &str> = HashMap::with_capacity(hashes.len());
    for entry in hashes {
        if by_user
            .insert(entry.username.as_str(), entry.hash.as_str())
            .is_some()
        {
            return Err(RenderError::UnusedHash(entry.username.clone()));
        }
    }

    let mut pairs = Vec::with_capacity(credentials.len());
    for cred in credentials {
        let hash = by_user
            .remove(cred.username.as_str())
            .ok_or_else(|| RenderError::MissingHash(cred.username.clone()))?;
        pairs.push((cred, hash));
    }

    if let Some(extra) = hashes.iter().find(|h| by_user.contains_key(h.username.as_str())) {
        return Err(RenderError::UnusedHash(extra.username.clone()));
    }
    Ok(pairs)
}

/// Quote a value for use inside a T-SQL string literal.
pub fn escape_literal(value: &str) -> Cow<'_, str> {
    if value.contains('\'') {
        Cow::Owned(value.replace('\'', "''"))
    } else {
        Cow::Borrowed(value)
    }
}

fn literal<'a>(value: &'a str, field: &str, user: &str) -> Cow<'a, str> {
    let escaped = escape_literal(value);
    if let Cow::Owned(_) = escaped {
        warn!(field, user, "Escaped single quote in SQL string literal");
    }
    escaped
}

// A line break would end the `--` comment and turn the rest into SQL.
fn comment<'a>(value: &'a str, field: &str, user: &str) -> Cow<'a, str> {
    if value.contains(['\r', '\n']) {
        warn!(field, user, "Replaced line break in SQL comment");
        Cow::Owned(value.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn identifier(name: &str) -> Cow<'_, str> {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        Cow::Borrowed(name)
    } else {
        warn!(database = name, "Bracket-quoting database name");
        Cow::Owned(format!("[{}]", name.replace(']', "]]")))
    }
}
