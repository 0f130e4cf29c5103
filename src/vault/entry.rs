//! Entry and RevealedEntry types stored inside a vault.

use zeroize::Zeroizing;

use crate::crypto::EncryptedBlob;

/// A single named secret.
///
/// The name is stored in clear text because it is the lookup key; both
/// other fields are sealed independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub description: EncryptedBlob,
    pub password: EncryptedBlob,
}

/// A decrypted entry, returned by `UnlockedSession::reveal`.
///
/// Both plaintext fields are wiped from memory on drop.
pub struct RevealedEntry {
    pub name: String,
    pub description: Zeroizing<String>,
    pub password: Zeroizing<String>,
}

/// Maximum length of an entry name.
const MAX_NAME_LEN: usize = 256;

/// Validate that an entry name is usable as a lookup key.
///
/// Any printable text is allowed; it must be non-empty, at most 256
/// characters, and free of control characters.
pub(crate) fn validate_entry_name(name: &str) -> crate::errors::Result<()> {
    use crate::errors::TinyPassError;

    if name.is_empty() {
        return Err(TinyPassError::InvalidEntryName(
            "entry name cannot be empty".into(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(TinyPassError::InvalidEntryName(format!(
            "entry name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(TinyPassError::InvalidEntryName(format!(
            "entry name {name:?} contains control characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_entry_name("github").is_ok());
        assert!(validate_entry_name("Work Email (old)").is_ok());
        assert!(validate_entry_name("bank/ß-ñ").is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("tab\there").is_err());
        assert!(validate_entry_name(&"x".repeat(257)).is_err());
    }
}
