//! AES-256-GCM authenticated encryption.
//!
//! Unlike a bare stream cipher, every ciphertext carries a 16-byte tag:
//! a wrong key, a wrong nonce, or a single flipped byte makes `decrypt`
//! fail instead of returning garbage.
//!
//! The nonce is kept separate from the ciphertext because the vault
//! document stores it in its own `iv` node.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use super::kdf::random_bytes;
use crate::errors::{Result, TinyPassError};

/// Size of the AES-256-GCM nonce in bytes.
pub const IV_LEN: usize = 12;

/// Size of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Generate a random 12-byte nonce.
pub fn generate_iv() -> Result<[u8; IV_LEN]> {
    random_bytes()
}

/// Encrypt `plaintext` with a 32-byte `key` under `iv`.
///
/// Returns ciphertext || tag.
pub fn encrypt(key: &[u8], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| TinyPassError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|e| TinyPassError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt and authenticate data produced by `encrypt`.
///
/// Every failure collapses into `AuthenticationFailed`; callers cannot
/// tell a wrong key from tampered bytes.
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if iv.len() != IV_LEN || ciphertext.len() < TAG_LEN {
        return Err(TinyPassError::AuthenticationFailed);
    }

    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| TinyPassError::AuthenticationFailed)?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| TinyPassError::AuthenticationFailed)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ciphertext_carries_tag() {
        let key = [0x42u8; 32];
        let iv = generate_iv().unwrap();
        let ct = encrypt(&key, &iv, b"hello").unwrap();
        assert_eq!(ct.len(), 5 + TAG_LEN);
        assert_eq!(&decrypt(&key, &iv, &ct).unwrap()[..], b"hello");
    }

    #[test]
    fn short_inputs_fail_authentication() {
        let key = [0x42u8; 32];
        assert!(matches!(
            decrypt(&key, &[0u8; 8], &[0u8; 32]),
            Err(TinyPassError::AuthenticationFailed)
        ));
        assert!(matches!(
            decrypt(&key, &[0u8; IV_LEN], &[0u8; 4]),
            Err(TinyPassError::AuthenticationFailed)
        ));
    }
}
