//! The in-memory vault value.
//!
//! `Vault` is immutable: `add_entry` returns a new vault and leaves the
//! receiver untouched.  Persisting is a separate step (see `format`).

use tracing::debug;

use super::entry::{validate_entry_name, Entry};
use super::master::MasterCredential;
use crate::crypto::entry::encrypt_field;
use crate::crypto::kdf::Argon2Params;
use crate::errors::{Result, TinyPassError};

#[derive(Debug, Clone, PartialEq)]
pub struct Vault {
    kdf: Argon2Params,
    master: Option<MasterCredential>,
    entries: Vec<Entry>,
}

impl Vault {
    /// A vault with no entries and no master credential yet.
    pub fn empty(kdf: Argon2Params) -> Self {
        Self {
            kdf,
            master: None,
            entries: Vec::new(),
        }
    }

    /// Install the master credential.
    pub fn with_master(self, master: MasterCredential) -> Self {
        Self {
            master: Some(master),
            ..self
        }
    }

    /// Assemble a vault from loaded parts, enforcing name uniqueness.
    pub(crate) fn from_parts(
        kdf: Argon2Params,
        master: MasterCredential,
        entries: Vec<Entry>,
    ) -> Result<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(TinyPassError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(Self {
            kdf,
            master: Some(master),
            entries,
        })
    }

    /// Return a copy of this vault with a new entry appended.
    ///
    /// Both fields are encrypted under `password`, each with its own salt
    /// and IV.  Fails with `DuplicateName` (case-sensitive) before doing
    /// any cryptographic work.
    pub fn add_entry(
        &self,
        name: &str,
        description: &str,
        secret: &str,
        password: &str,
    ) -> Result<Self> {
        validate_entry_name(name)?;
        if self.find_entry(name).is_some() {
            return Err(TinyPassError::DuplicateName(name.to_string()));
        }

        let entry = Entry {
            name: name.to_string(),
            description: encrypt_field(password, description, &self.kdf)?,
            password: encrypt_field(password, secret, &self.kdf)?,
        };
        debug!(entries = self.entries.len() + 1, "entry sealed");

        let mut entries = self.entries.clone();
        entries.push(entry);
        Ok(Self {
            kdf: self.kdf,
            master: self.master.clone(),
            entries,
        })
    }

    /// Look up an entry by exact name.
    pub fn find_entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `None` until the vault has been initialized.
    pub fn master(&self) -> Option<&MasterCredential> {
        self.master.as_ref()
    }

    /// The Argon2id parameters every derivation in this vault uses.
    pub fn kdf_params(&self) -> &Argon2Params {
        &self.kdf
    }
}
