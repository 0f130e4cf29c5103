//! Field-level envelope encryption.
//!
//! Each field (an entry's description or its password) is sealed on its
//! own: a fresh salt feeds the KDF, a fresh IV feeds AES-256-GCM, and the
//! three values travel together as an `EncryptedBlob`.

use tracing::trace;
use zeroize::Zeroizing;

use super::encryption::{decrypt, encrypt, generate_iv, IV_LEN};
use super::kdf::{generate_salt, Argon2Params, Salt};
use super::keys::derive_encryption_key;
use crate::errors::{Result, TinyPassError};

/// One encrypted field: `{iv, salt, ciphertext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// AES-GCM nonce, unique to this blob.
    pub iv: [u8; IV_LEN],
    /// KDF salt, unique to this blob.
    pub salt: Salt,
    /// Ciphertext followed by the 16-byte authentication tag.
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under a key derived from `password` and a fresh salt.
pub fn encrypt_field(password: &str, plaintext: &str, params: &Argon2Params) -> Result<EncryptedBlob> {
    let salt = generate_salt()?;
    let iv = generate_iv()?;

    let key = derive_encryption_key(password.as_bytes(), &salt, params)?;
    let ciphertext = encrypt(key.as_bytes(), &iv, plaintext.as_bytes())?;
    drop(key);

    trace!(len = ciphertext.len(), "sealed field");
    Ok(EncryptedBlob {
        iv,
        salt,
        ciphertext,
    })
}

/// Decrypt a blob produced by `encrypt_field`.
///
/// A wrong password or any modified byte yields `AuthenticationFailed`;
/// no partially decrypted data is ever returned.
pub fn decrypt_field(
    password: &str,
    blob: &EncryptedBlob,
    params: &Argon2Params,
) -> Result<Zeroizing<String>> {
    let key = derive_encryption_key(password.as_bytes(), &blob.salt, params)?;
    let plaintext = decrypt(key.as_bytes(), &blob.iv, &blob.ciphertext)?;
    drop(key);

    // `plaintext` is zeroized on drop whether or not this succeeds.
    let text = std::str::from_utf8(&plaintext).map_err(|_| TinyPassError::AuthenticationFailed)?;
    Ok(Zeroizing::new(text.to_owned()))
}
