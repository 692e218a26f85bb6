//! Domain types shared by the generator and the cracker

pub mod credential;
pub mod hash_scheme;

pub use credential::{Credential, CredentialSet, UserHash};
pub use hash_scheme::{BcryptVersion, HashScheme};
