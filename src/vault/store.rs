//! Where vault bytes live.
//!
//! `VaultStore` is the narrow persistence seam the rest of the crate talks
//! to: check for a vault, read its bytes, write new bytes.  `FileStore`
//! is the real implementation; `MemoryStore` keeps everything in memory
//! and can be told to fail writes, which is what the tests use.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{Result, TinyPassError};

pub trait VaultStore {
    /// Human-readable location, used in error messages.
    fn location(&self) -> &Path;

    /// Whether a persisted vault is already present.
    fn exists(&self) -> Result<bool>;

    /// Read the whole vault.  Missing → `VaultNotFound`.
    fn read(&self) -> Result<Vec<u8>>;

    /// Replace the vault with `bytes`.  Must be atomic: either the new
    /// content is fully in place or the previous content is untouched.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// A vault stored in a single file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling temp file used for atomic replacement.
    ///
    /// It lives in the same directory so the rename stays on one
    /// filesystem.
    fn tmp_path(&self) -> PathBuf {
        self.parent_dir().join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ))
    }

    /// Directory holding the vault file; `.` for a bare file name.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Flush the directory entry so the rename itself is durable.
    #[cfg(unix)]
    fn sync_dir(dir: &Path) -> io::Result<()> {
        fs::File::open(dir)?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_dir(_dir: &Path) -> io::Result<()> {
        Ok(())
    }

    fn write_tmp(tmp_path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        // Owner-only permissions on the vault file.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl VaultStore for FileStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.path.try_exists()?)
    }

    fn read(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(TinyPassError::VaultNotFound(self.path.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file, fsync it, rename it over the target, then
    /// fsync the directory.
    ///
    /// The rename ensures readers never see a half-written file.
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let tmp_path = self.tmp_path();

        let result = Self::write_tmp(&tmp_path, bytes)
            .and_then(|()| fs::rename(&tmp_path, &self.path))
            .and_then(|()| Self::sync_dir(self.parent_dir()));

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "vault write failed");
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), "vault file replaced");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A vault held in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    location: PathBuf,
    bytes: Option<Vec<u8>>,
    fail_writes: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty store (no vault yet).
    pub fn new() -> Self {
        Self {
            location: PathBuf::from("<memory>"),
            bytes: None,
            fail_writes: false,
        }
    }

    /// A store that already holds `bytes`.
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Some(bytes),
            ..Self::new()
        }
    }

    /// Make every subsequent `write` fail with an I/O error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The currently persisted bytes, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

impl VaultStore for MemoryStore {
    fn location(&self) -> &Path {
        &self.location
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.bytes.is_some())
    }

    fn read(&self) -> Result<Vec<u8>> {
        self.bytes
            .clone()
            .ok_or_else(|| TinyPassError::VaultNotFound(self.location.clone()))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated write failure").into());
        }
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nope.vault"));
        assert!(!store.exists().unwrap());
        assert!(matches!(
            store.read(),
            Err(TinyPassError::VaultNotFound(_))
        ));
    }

    #[test]
    fn write_replaces_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.vault");
        let mut store = FileStore::new(&path);

        store.write(b"first").unwrap();
        store.write(b"second").unwrap();

        assert!(store.exists().unwrap());
        assert_eq!(store.read().unwrap(), b"second");
        assert!(!dir.path().join(".data.vault.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn vault_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.vault");
        FileStore::new(&path).write(b"x").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn failed_write_keeps_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.vault");
        let mut store = FileStore::new(&path);
        store.write(b"good").unwrap();

        // A directory squatting on the temp path makes the write fail.
        fs::create_dir(dir.path().join(".data.vault.tmp")).unwrap();
        assert!(matches!(
            store.write(b"bad"),
            Err(TinyPassError::PersistenceFailure(_))
        ));
        assert_eq!(fs::read(&path).unwrap(), b"good");
    }

    #[test]
    fn bare_file_name_uses_current_dir() {
        let store = FileStore::new("tinypass.vault");
        assert_eq!(store.parent_dir(), Path::new("."));
        assert_eq!(store.tmp_path(), Path::new("./.tinypass.vault.tmp"));

        let nested = FileStore::new("/srv/vaults/work.vault");
        assert_eq!(nested.parent_dir(), Path::new("/srv/vaults"));
    }

    #[cfg(unix)]
    #[test]
    fn directory_sync_succeeds_for_vault_dir() {
        let dir = TempDir::new().unwrap();
        assert!(FileStore::sync_dir(dir.path()).is_ok());
        assert!(FileStore::sync_dir(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn memory_store_can_fail_writes() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.read(),
            Err(TinyPassError::VaultNotFound(_))
        ));
        store.write(b"abc").unwrap();
        store.set_fail_writes(true);
        assert!(store.write(b"def").is_err());
        assert_eq!(store.bytes(), Some(&b"abc"[..]));
    }
}
