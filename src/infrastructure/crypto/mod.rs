//! Hashing primitives

pub mod legacy;
pub mod password;

pub use password::{hash_password, verify_password, PasswordHasher, DEFAULT_COST};
