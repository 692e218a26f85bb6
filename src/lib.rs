//! # AWE Electronics credential tools
//!
//! Administrative utilities for the sample store's user database.
//!
//! ## Architecture
//!
//! - **domain**: credentials, generated hashes and hash schemes
//! - **application**: the hash generator, SQL script rendering and the wordlist cracker
//! - **infrastructure**: bcrypt and legacy SHA-256 primitives, tracing setup
//! - **config**: TOML configuration with the seed values as defaults
//! - **shared**: error types

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::init_tracing;
