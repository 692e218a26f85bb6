//! Generator and cracker use cases

pub mod cracker;
pub mod generator;
pub mod sql_script;

pub use cracker::{
    load_wordlist, parse_wordlist, Attempt, CandidateOutcome, CrackReport, CrackResult, Cracker,
};
pub use generator::{write_script, Generation, HashGenerator};
pub use sql_script::{escape_literal, SqlScript};
