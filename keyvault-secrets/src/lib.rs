//! Key Vault secrets emulation
//!
//! Provides an in-memory secrets client with support for:
//! - GetSecret, SetSecret, UpdateSecretProperties
//! - DeleteSecret (soft delete), RecoverDeletedSecret, PurgeDeletedSecret
//! - ListPropertiesOfSecrets, ListDeletedSecrets

pub mod client;
pub mod error;
mod storage;

pub use client::SecretClient;
pub use error::{EntityKind, SecretError};
pub use storage::{
    DeletedSecrets, KeyVaultSecret, SecretProperties, SecretPropertiesIter, SecretStore, SeedSecret,
};
