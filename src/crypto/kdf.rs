//! Password stretching using Argon2id, plus CSPRNG helpers.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  Every derivation in a vault (verification hash and
//! per-field keys) goes through `stretch_password` with the vault's
//! stored `Argon2Params`.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::Zeroizing;

use crate::errors::{Result, TinyPassError};

/// Length of every salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the stretched password in bytes (256 bits).
pub const STRETCHED_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Largest memory cost we will allocate, in KiB (4 GB).
pub const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Largest accepted iteration count.
pub const MAX_ITERATIONS: u32 = 64;

/// Largest accepted number of parallel lanes.
pub const MAX_PARALLELISM: u32 = 64;

/// A fresh random salt.  Never reused across contexts.
pub type Salt = [u8; SALT_LEN];

/// Argon2id work factors.
///
/// These map 1:1 to the fields in `Settings` and to the `kdf` node of
/// the vault document, so a vault always reopens with the parameters it
/// was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// The weakest parameters we accept.  Handy for tests.
    pub const MINIMUM: Self = Self {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    };

    /// Reject parameters that are too weak to protect a vault, or so
    /// large that hashing would exhaust memory or never finish.
    pub fn validate(&self) -> Result<()> {
        check_range("memory_kib", self.memory_kib, MIN_MEMORY_KIB, MAX_MEMORY_KIB)?;
        check_range("iterations", self.iterations, 1, MAX_ITERATIONS)?;
        check_range("parallelism", self.parallelism, 1, MAX_PARALLELISM)
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(TinyPassError::KeyDerivationFailed(format!(
            "Argon2 {field} must be between {min} and {max} (got {value})"
        )));
    }
    Ok(())
}

/// Stretch a password and salt into 32 bytes of key material.
///
/// The same password + salt + params always produce the same output.
/// The result is wiped from memory when dropped.
pub fn stretch_password(
    password: &[u8],
    salt: &[u8],
    argon2_params: &Argon2Params,
) -> Result<Zeroizing<[u8; STRETCHED_LEN]>> {
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(STRETCHED_LEN),
    )
    .map_err(|e| TinyPassError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; STRETCHED_LEN]);
    argon2
        .hash_password_into(password, salt, &mut output[..])
        .map_err(|e| TinyPassError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(output)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> Result<Salt> {
    random_bytes()
}

/// Fill a fixed-size array from the operating system's CSPRNG.
///
/// There is no fallback source: if the OS cannot provide randomness the
/// caller gets `RandomnessUnavailable`.
pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|_| TinyPassError::RandomnessUnavailable)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(Argon2Params::default().validate().is_ok());
        assert!(Argon2Params::MINIMUM.validate().is_ok());
    }

    #[test]
    fn rejects_weak_params() {
        let weak = Argon2Params {
            memory_kib: 1_024,
            ..Argon2Params::MINIMUM
        };
        assert!(matches!(
            stretch_password(b"pw", &[0u8; SALT_LEN], &weak),
            Err(TinyPassError::KeyDerivationFailed(_))
        ));

        let no_iterations = Argon2Params {
            iterations: 0,
            ..Argon2Params::MINIMUM
        };
        assert!(no_iterations.validate().is_err());
    }

    #[test]
    fn rejects_oversized_params_before_hashing() {
        let huge_memory = Argon2Params {
            memory_kib: u32::MAX,
            ..Argon2Params::MINIMUM
        };
        assert!(matches!(
            stretch_password(b"pw", &[0u8; SALT_LEN], &huge_memory),
            Err(TinyPassError::KeyDerivationFailed(_))
        ));

        let too_many_iterations = Argon2Params {
            iterations: MAX_ITERATIONS + 1,
            ..Argon2Params::MINIMUM
        };
        assert!(too_many_iterations.validate().is_err());

        let too_many_lanes = Argon2Params {
            parallelism: MAX_PARALLELISM + 1,
            ..Argon2Params::MINIMUM
        };
        assert!(too_many_lanes.validate().is_err());

        let at_the_limit = Argon2Params {
            memory_kib: MAX_MEMORY_KIB,
            iterations: MAX_ITERATIONS,
            parallelism: MAX_PARALLELISM,
        };
        assert!(at_the_limit.validate().is_ok());
    }

    #[test]
    fn salts_are_fresh() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
        assert_ne!(a, [0u8; SALT_LEN]);
    }
}
