//! Cryptographic primitives for TinyPass.
//!
//! This module provides:
//! - Argon2id password stretching and CSPRNG salts (`kdf`)
//! - HKDF domain separation into verification hashes and field keys (`keys`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - The per-field `EncryptedBlob` envelope (`entry`)

pub mod encryption;
pub mod entry;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt_field, decrypt_field, ...};
pub use encryption::{decrypt, encrypt, generate_iv};
pub use entry::{decrypt_field, encrypt_field, EncryptedBlob};
pub use kdf::{generate_salt, stretch_password, Argon2Params, Salt};
pub use keys::{derive_encryption_key, derive_verification_hash, FieldKey};
