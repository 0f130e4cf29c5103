//! High-level vault operations used by CLI commands.
//!
//! `VaultService` ties the model, the crypto layer and an injected
//! `VaultStore` together: initialize a vault, unlock it, add entries.
//! It holds no secrets itself; the verified master password lives only
//! in the `UnlockedSession` returned by `unlock`.

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::entry::RevealedEntry;
use super::format;
use super::master::MasterCredential;
use super::model::Vault;
use super::store::VaultStore;
use crate::crypto::entry::decrypt_field;
use crate::crypto::kdf::Argon2Params;
use crate::errors::{Result, TinyPassError};

pub struct VaultService<S: VaultStore> {
    store: S,
    /// Argon2 parameters for vaults created by this service.
    kdf: Argon2Params,
}

impl<S: VaultStore> VaultService<S> {
    /// A service using the default Argon2 parameters for new vaults.
    pub fn new(store: S) -> Self {
        Self::with_kdf_params(store, Argon2Params::default())
    }

    /// A service using explicit Argon2 parameters for new vaults.
    ///
    /// Existing vaults always reopen with the parameters stored in them.
    pub fn with_kdf_params(store: S, kdf: Argon2Params) -> Self {
        Self { store, kdf }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Create and persist a brand-new, empty vault.
    ///
    /// The two passwords are compared as raw strings.  An existing vault
    /// is never overwritten.
    pub fn initialize(&mut self, password: &str, password_confirm: &str) -> Result<Vault> {
        if self.store.exists()? {
            return Err(TinyPassError::VaultAlreadyExists(
                self.store.location().to_path_buf(),
            ));
        }
        if password.as_bytes() != password_confirm.as_bytes() {
            return Err(TinyPassError::PasswordMismatch);
        }

        let master = MasterCredential::create(password, &self.kdf)?;
        let vault = Vault::empty(self.kdf).with_master(master);
        format::save_vault(&mut self.store, &vault)?;

        info!(location = %self.store.location().display(), "vault initialized");
        Ok(vault)
    }

    /// Load the vault and check `password` against its master credential.
    ///
    /// A wrong password is `IncorrectPassword`, with no hint about which
    /// stored value failed to match.
    pub fn unlock(&self, password: &str) -> Result<UnlockedSession> {
        let vault = format::load_vault(&self.store)?;

        let master = vault.master().ok_or_else(|| {
            TinyPassError::VaultCorrupt("vault has no master credential".into())
        })?;

        if !master.verify(password, vault.kdf_params())? {
            warn!(location = %self.store.location().display(), "unlock rejected");
            return Err(TinyPassError::IncorrectPassword);
        }

        debug!(entries = vault.len(), "vault unlocked");
        Ok(UnlockedSession {
            password: Zeroizing::new(password.to_owned()),
            vault,
        })
    }

    /// Add an entry and persist the result.
    ///
    /// The session only sees the new vault once it has been written.  If
    /// the write fails the session, and the stored vault, keep their
    /// previous state.
    pub fn add_entry<'s>(
        &mut self,
        session: &'s mut UnlockedSession,
        name: &str,
        description: &str,
        secret: &str,
    ) -> Result<&'s Vault> {
        let updated = session
            .vault
            .add_entry(name, description, secret, &session.password)?;

        format::save_vault(&mut self.store, &updated)?;
        session.vault = updated;

        info!(entries = session.vault.len(), "entry added");
        Ok(&session.vault)
    }
}

/// A vault opened with a verified master password.
///
/// The password is kept (zeroized on drop) because every field is
/// encrypted under a key derived from it.
pub struct UnlockedSession {
    password: Zeroizing<String>,
    vault: Vault,
}

impl UnlockedSession {
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.vault.names().collect()
    }

    /// Decrypt both fields of the entry called `name`.
    pub fn reveal(&self, name: &str) -> Result<RevealedEntry> {
        let entry = self
            .vault
            .find_entry(name)
            .ok_or_else(|| TinyPassError::EntryNotFound(name.to_string()))?;

        let params = self.vault.kdf_params();
        Ok(RevealedEntry {
            name: entry.name.clone(),
            description: decrypt_field(&self.password, &entry.description, params)?,
            password: decrypt_field(&self.password, &entry.password, params)?,
        })
    }
}
