//! Wordlist scan of a stored password hash
//!
//! Candidates are verified in order and the scan stops at the first match.
//! A candidate whose verification fails is recorded as an error and the scan
//! moves on. When the list is exhausted a fresh hash of the fallback password
//! is produced so the operator has a replacement value ready.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::HashScheme;
use crate::infrastructure::crypto::{verify_password, PasswordHasher};
use crate::shared::{AppError, AppResult, CryptoError};

/// Result of testing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Match,
    NoMatch,
    /// Verification failed (e.g. malformed stored hash)
    Error(String),
}

impl From<Result<bool, CryptoError>> for CandidateOutcome {
    fn from(result: Result<bool, CryptoError>) -> Self {
        match result {
            Ok(true) => CandidateOutcome::Match,
            Ok(false) => CandidateOutcome::NoMatch,
            Err(e) => CandidateOutcome::Error(e.to_string()),
        }
    }
}

impl fmt::Display for CandidateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateOutcome::Match => write!(f, "MATCH!"),
            CandidateOutcome::NoMatch => write!(f, "No match"),
            CandidateOutcome::Error(reason) => write!(f, "Error - {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub candidate: String,
    pub outcome: CandidateOutcome,
}

/// Terminal state of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrackResult {
    Found {
        password: String,
    },
    Exhausted {
        fallback_password: String,
        fallback_hash: String,
    },
}

#[derive(Debug, Clone)]
pub struct CrackReport {
    pub stored_hash: String,
    /// Candidates actually tested, in order
    pub attempts: Vec<Attempt>,
    pub result: CrackResult,
}

impl CrackReport {
    pub fn found(&self) -> Option<&str> {
        match &self.result {
            CrackResult::Found { password } => Some(password),
            CrackResult::Exhausted { .. } => None,
        }
    }

    pub fn errors(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, CandidateOutcome::Error(_)))
            .count()
    }
}

pub struct Cracker {
    fallback_hasher: PasswordHasher,
    fallback_password: String,
}

impl Cracker {
    /// `fallback_hasher` always emits bcrypt, whatever scheme it was configured with.
    pub fn new(fallback_hasher: PasswordHasher, fallback_password: impl Into<String>) -> Self {
        Self {
            fallback_hasher: fallback_hasher.with_scheme(HashScheme::Bcrypt),
            fallback_password: fallback_password.into(),
        }
    }

    pub fn crack<I, S>(&self, stored_hash: &str, candidates: I) -> Result<CrackReport, CryptoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.crack_with(stored_hash, candidates, |_| {})
    }

    /// Scan `candidates`, calling `on_attempt` after each one is tested.
    ///
    /// Only generating the fallback hash can fail.
    pub fn crack_with<I, S, F>(
        &self,
        stored_hash: &str,
        candidates: I,
        mut on_attempt: F,
    ) -> Result<CrackReport, CryptoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&Attempt),
    {
        match HashScheme::detect(stored_hash) {
            Some(scheme) => info!(%scheme, "Scanning wordlist against stored hash"),
            None => warn!("Stored hash format is not recognized; every candidate will fail"),
        }

        let mut attempts = Vec::new();
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let outcome = CandidateOutcome::from(verify_password(candidate, stored_hash));
            let matched = outcome == CandidateOutcome::Match;
            if let CandidateOutcome::Error(reason) = &outcome {
                warn!(%reason, "Candidate verification failed");
            } else {
                debug!(matched, "Candidate tested");
            }

            let attempt = Attempt {
                candidate: candidate.to_string(),
                outcome,
            };
            on_attempt(&attempt);
            attempts.push(attempt);

            if matched {
                info!(tested = attempts.len(), "Password found");
                return Ok(CrackReport {
                    stored_hash: stored_hash.to_string(),
                    attempts,
                    result: CrackResult::Found {
                        password: candidate.to_string(),
                    },
                });
            }
        }

        info!(tested = attempts.len(), "Wordlist exhausted without a match");
        let fallback_hash = self.fallback_hasher.hash(&self.fallback_password)?;
        Ok(CrackReport {
            stored_hash: stored_hash.to_string(),
            attempts,
            result: CrackResult::Exhausted {
                fallback_password: self.fallback_password.clone(),
                fallback_hash,
            },
        })
    }
}

/// Parse a wordlist: one candidate per line, blank lines skipped.
pub fn parse_wordlist(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn load_wordlist(path: &Path) -> AppResult<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    let words = parse_wordlist(&text);
    info!(path = %path.display(), candidates = words.len(), "Wordlist loaded");
    Ok(words)
}
