//! The master credential: a salt and a one-way hash of the master password.
//!
//! The password itself is never stored.  Unlocking recomputes the hash
//! from the candidate password and the stored salt and compares the two
//! in constant time.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::crypto::kdf::{generate_salt, Argon2Params, Salt};
use crate::crypto::keys::{derive_verification_hash, HASH_LEN};
use crate::errors::Result;

#[derive(Clone, PartialEq, Eq)]
pub struct MasterCredential {
    salt: Salt,
    hash: [u8; HASH_LEN],
}

impl MasterCredential {
    /// Create a credential for `password` under a fresh salt.
    pub fn create(password: &str, params: &Argon2Params) -> Result<Self> {
        let salt = generate_salt()?;
        let hash = derive_verification_hash(password.as_bytes(), &salt, params)?;
        Ok(Self { salt, hash })
    }

    /// Rebuild a credential from persisted values.
    pub fn from_parts(salt: Salt, hash: [u8; HASH_LEN]) -> Self {
        Self { salt, hash }
    }

    /// Check `candidate` against the stored hash.
    ///
    /// A mismatch is `Ok(false)`.  Only a KDF failure is an error.
    pub fn verify(&self, candidate: &str, params: &Argon2Params) -> Result<bool> {
        let mut candidate_hash = derive_verification_hash(candidate.as_bytes(), &self.salt, params)?;
        let matches: bool = candidate_hash[..].ct_eq(&self.hash[..]).into();
        candidate_hash.zeroize();
        Ok(matches)
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn hash(&self) -> &[u8; HASH_LEN] {
        &self.hash
    }
}

impl fmt::Debug for MasterCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterCredential").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_material() {
        let cred = MasterCredential::from_parts([7u8; 32], [9u8; HASH_LEN]);
        let shown = format!("{cred:?}");
        assert_eq!(shown, "MasterCredential { .. }");
    }
}
