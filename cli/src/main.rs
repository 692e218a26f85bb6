//! AWE Electronics credential tools
//!
//! ```sh
//! # Hash the seed users and write UPDATE_USER_PASSWORDS.sql
//! awe-cred generate
//!
//! # Custom users and output path
//! awe-cred generate -u admin=s3cret -u ops=hunter2 --output seed.sql
//!
//! # Test the stored admin hash with the built-in wordlist
//! awe-cred crack
//!
//! # Test a specific hash with a wordlist file
//! awe-cred crack --hash '$2a$11$...' --wordlist words.txt
//!
//! # One-off hash / verify
//! awe-cred hash admin123
//! awe-cred verify admin123 '$2b$11$...'
//!
//! # Validate config without doing anything
//! awe-cred --check
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::{error, info};

use awe_credentials::application::{
    load_wordlist, write_script, CandidateOutcome, CrackResult, Cracker, HashGenerator,
};
use awe_credentials::domain::{Credential, CredentialSet, HashScheme};
use awe_credentials::infrastructure::crypto::verify_password;
use awe_credentials::shared::{AppError, AppResult, ConfigError};
use awe_credentials::{default_config_path, init_tracing, AppConfig};

/// Password hash seeding and recovery for the AWE Electronics user database.
#[derive(Parser, Debug)]
#[command(
    name = "awe-cred",
    version,
    about = "Generate and check password hashes for the AWE Electronics user database",
    long_about = "Generates bcrypt hashes and a SQL update script for the sample \
                  store's users, and scans stored hashes against a wordlist.\n\n\
                  Default config: ~/.config/awe-credentials/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "AWE_CRED_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Override the bcrypt work factor.
    #[arg(long, global = true)]
    cost: Option<u32>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash every configured user and write the SQL update script.
    Generate {
        /// Output path for the SQL script (overwritten).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// User to hash, as USER=PASSWORD. Replaces the configured users.
        #[arg(short = 'u', long = "user", value_name = "USER=PASSWORD")]
        users: Vec<String>,

        /// Database named in the `USE` statement.
        #[arg(long)]
        database: Option<String>,

        /// Hash scheme to emit (bcrypt, sha256).
        #[arg(long, value_parser = parse_scheme)]
        scheme: Option<HashScheme>,

        /// Leave the plaintext login table out of the script.
        #[arg(long)]
        no_credentials: bool,

        /// Print the script without writing the file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Test a stored hash against a wordlist, stopping at the first match.
    Crack {
        /// Stored hash to test.
        #[arg(long)]
        hash: Option<String>,

        /// Wordlist file, one candidate per line.
        #[arg(short, long, conflicts_with = "candidates")]
        wordlist: Option<PathBuf>,

        /// Candidate password. Repeat to build the list.
        #[arg(short = 'p', long = "candidate", value_name = "PASSWORD")]
        candidates: Vec<String>,

        /// Password hashed and printed when nothing matches.
        #[arg(long)]
        fallback: Option<String>,
    },

    /// Hash one password and verify the result.
    Hash { password: String },

    /// Check one password against one stored hash.
    Verify { password: String, hash: String },
}

fn parse_scheme(value: &str) -> Result<HashScheme, String> {
    match value.to_lowercase().as_str() {
        "bcrypt" => Ok(HashScheme::Bcrypt),
        "sha256" | "sha-256" => Ok(HashScheme::Sha256),
        other => Err(format!("unknown scheme '{}', expected bcrypt or sha256", other)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let mut config = match AppConfig::load_or_default(&config_path) {
        Ok((mut cfg, found)) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg.logging);
            if found {
                info!("Configuration loaded from {}", config_path.display());
            } else {
                info!(
                    "No config at {}, using built-in defaults",
                    config_path.display()
                );
            }
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .with_writer(std::io::stderr)
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(cost) = cli.cost {
        info!("CLI override: cost = {}", cost);
        config.hashing.cost = cost;
    }
    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    if cli.check {
        print_check(&config_path, &config);
        return ExitCode::SUCCESS;
    }

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            error!("Failed to print help: {}", e);
        }
        return ExitCode::FAILURE;
    };

    match run(command, config) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_check(config_path: &std::path::Path, config: &AppConfig) {
    println!("✅ Configuration is valid");
    println!("   Config file : {}", config_path.display());
    println!("   Log level   : {}", config.logging.level);
    println!(
        "   Hashing     : {} cost {} ({})",
        config.generator.scheme,
        config.hashing.cost,
        config.hashing.bcrypt_version.prefix()
    );
    println!("   Users       : {}", config.generator.users.len());
    println!("   Output      : {}", config.generator.output.display());
    println!("   Database    : {}", config.generator.database);
    println!("   Wordlist    : {} candidates", config.cracker.wordlist.len());
}

fn run(command: Command, mut config: AppConfig) -> AppResult<ExitCode> {
    match command {
        Command::Generate {
            output,
            users,
            database,
            scheme,
            no_credentials,
            dry_run,
        } => {
            if !users.is_empty() {
                config.generator.users = users
                    .iter()
                    .map(|pair| Credential::parse_pair(pair))
                    .collect::<Result<_, ConfigError>>()?;
            }
            if let Some(path) = output {
                config.generator.output = path;
            }
            if let Some(db) = database {
                config.generator.database = db;
            }
            if let Some(scheme) = scheme {
                config.generator.scheme = scheme;
            }
            if no_credentials {
                config.generator.print_credentials = false;
            }
            generate(&config, dry_run)
        }
        Command::Crack {
            hash,
            wordlist,
            candidates,
            fallback,
        } => {
            if let Some(hash) = hash {
                config.cracker.stored_hash = hash;
            }
            if let Some(path) = wordlist {
                config.cracker.wordlist = load_wordlist(&path)?;
            } else if !candidates.is_empty() {
                config.cracker.wordlist = candidates;
            }
            if let Some(password) = fallback {
                config.cracker.fallback_password = password;
            }
            crack(&config)
        }
        Command::Hash { password } => {
            let hash = config
                .hasher()
                .with_scheme(HashScheme::Bcrypt)
                .hash(&password)?;
            let verified = verify_password(&password, &hash)?;
            println!("Password: {}", password);
            println!("Hash: {}", hash);
            println!();
            println!("Verification: {}", verified);
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { password, hash } => {
            println!("Hash: {}", hash);
            let outcome = CandidateOutcome::from(verify_password(&password, &hash));
            println!("Password '{}': {}", password, outcome);
            Ok(match outcome {
                CandidateOutcome::Match => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
    }
}

fn generate(config: &AppConfig, dry_run: bool) -> AppResult<ExitCode> {
    let credentials: CredentialSet = config.credentials()?;
    let generator = HashGenerator::new(config.hasher(), config.sql_layout());

    let scheme_label = match config.generator.scheme {
        HashScheme::Bcrypt => "BCrypt",
        HashScheme::Sha256 => "SHA-256",
    };
    println!("Generating {} hashes for AWE Electronics users", scheme_label);
    println!("{}", "=".repeat(60));
    println!();

    let generation = generator.generate(&credentials)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    generation
        .write_report(&credentials, &mut out)
        .map_err(|e| AppError::io("<stdout>", e))?;
    out.flush().map_err(|e| AppError::io("<stdout>", e))?;
    drop(out);

    let path = &config.generator.output;
    if dry_run {
        println!();
        println!("Dry run: {} not written", path.display());
    } else {
        write_script(path, &generation.script)?;
        println!();
        println!("SQL script saved to: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn crack(config: &AppConfig) -> AppResult<ExitCode> {
    let stored_hash = &config.cracker.stored_hash;
    let cracker = Cracker::new(config.hasher(), config.cracker.fallback_password.clone());

    println!("Testing hash: {}", stored_hash);
    println!();

    let report = cracker.crack_with(stored_hash, &config.cracker.wordlist, |attempt| {
        println!("Password '{}': {}", attempt.candidate, attempt.outcome);
    })?;

    match &report.result {
        CrackResult::Found { password } => {
            println!();
            println!("*** FOUND THE PASSWORD! ***");
            println!("The password is: {}", password);
        }
        CrackResult::Exhausted {
            fallback_password,
            fallback_hash,
        } => {
            println!();
            println!("No matching password found.");
            println!();
            println!("Generating new BCrypt hash for '{}':", fallback_password);
            println!("New hash: {}", fallback_hash);
        }
    }
    Ok(ExitCode::SUCCESS)
}
