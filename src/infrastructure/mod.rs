//! External concerns: hashing primitives and tracing setup

pub mod crypto;
pub mod telemetry;

pub use telemetry::init_tracing;
