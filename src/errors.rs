use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in TinyPass.
#[derive(Debug, Error)]
pub enum TinyPassError {
    // --- Crypto errors ---
    #[error("Secure randomness is unavailable on this system")]
    RandomnessUnavailable,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed: wrong password or tampered data")]
    AuthenticationFailed,

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Vault is corrupt: {0}")]
    VaultCorrupt(String),

    #[error("The master password is incorrect")]
    IncorrectPassword,

    #[error("The passwords do not match")]
    PasswordMismatch,

    #[error("An entry named '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid entry name: {0}")]
    InvalidEntryName(String),

    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    // --- IO errors ---
    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for TinyPass results.
pub type Result<T> = std::result::Result<T, TinyPassError>;
