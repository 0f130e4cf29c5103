//! Domain-separated derivations on top of Argon2id.
//!
//! Both the master-password verification hash and the per-field
//! encryption keys come from the same stretched password material; an
//! HKDF-SHA256 expand step with a distinct `info` label keeps them
//! independent, so a verification hash never doubles as a key.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::kdf::{stretch_password, Argon2Params};
use crate::errors::{Result, TinyPassError};

/// Length of the verification hash in bytes.
pub const HASH_LEN: usize = 32;

/// Length of a field key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

const VERIFY_INFO: &[u8] = b"tinypass/v1/verify";
const FIELD_KEY_INFO: &[u8] = b"tinypass/v1/field-key";

/// A 32-byte symmetric key for a single encrypted field.
///
/// Zeroed when dropped, so it cannot linger after the one encrypt or
/// decrypt call it was derived for.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FieldKey {
    bytes: [u8; KEY_LEN],
}

impl FieldKey {
    /// Access the raw key bytes to hand to the cipher.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive the one-way hash used to verify the master password.
pub fn derive_verification_hash(
    password: &[u8],
    salt: &[u8],
    params: &Argon2Params,
) -> Result<[u8; HASH_LEN]> {
    let stretched = stretch_password(password, salt, params)?;
    let hash = hkdf_expand(&stretched[..], VERIFY_INFO)?;
    Ok(*hash)
}

/// Derive the AES-256 key for one encrypted field.
pub fn derive_encryption_key(
    password: &[u8],
    salt: &[u8],
    params: &Argon2Params,
) -> Result<FieldKey> {
    let stretched = stretch_password(password, salt, params)?;
    let okm = hkdf_expand(&stretched[..], FIELD_KEY_INFO)?;
    Ok(FieldKey { bytes: *okm })
}

/// Run HKDF-SHA256 expand with the given `info`.
///
/// The extract step is skipped: the input already came out of Argon2id.
fn hkdf_expand(ikm: &[u8], info: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(info, &mut okm[..])
        .map_err(|e| TinyPassError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}
