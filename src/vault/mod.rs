//! Vault module: the credential store and its persistence.
//!
//! This module provides:
//! - `MasterCredential` for verifying the master password (`master`)
//! - `Entry` and `RevealedEntry` types (`entry`)
//! - The immutable `Vault` value (`model`)
//! - The on-disk document and its mapping to `Vault` (`format`)
//! - The `VaultStore` persistence seam (`store`)
//! - `VaultService` and `UnlockedSession` for initialize/unlock/add (`service`)

pub mod entry;
pub mod format;
pub mod master;
pub mod model;
pub mod service;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{Entry, RevealedEntry};
pub use format::{StoredArgon2Params, VaultDocument};
pub use master::MasterCredential;
pub use model::Vault;
pub use service::{UnlockedSession, VaultService};
pub use store::{FileStore, MemoryStore, VaultStore};
