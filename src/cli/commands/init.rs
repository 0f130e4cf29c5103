//! `tinypass init`: create a new, empty vault.

use std::fs;

use crate::cli::output;
use crate::cli::{open_service, prompt_new_password, Cli};
use crate::errors::{Result, TinyPassError};
use crate::vault::VaultStore;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut service = open_service(cli)?;
    let vault_path = service.store().location().to_path_buf();

    // 1. Refuse before prompting if a vault is already there.
    if service.store().exists()? {
        output::tip("Use `tinypass add <NAME>` to add entries to the existing vault.");
        return Err(TinyPassError::VaultAlreadyExists(vault_path));
    }

    // 2. Create the parent directory if it doesn't exist.
    if let Some(dir) = vault_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
            output::info(&format!("Created vault directory: {}", dir.display()));
        }
    }

    // 3. Prompt twice; the service rejects a mismatch.
    let (password, confirm) = prompt_new_password()?;
    service.initialize(&password, &confirm)?;

    output::success(&format!("Vault created at {}", vault_path.display()));
    output::tip("Run `tinypass add <NAME>` to add an entry.");
    output::tip("Run `tinypass list` to see all entries.");

    Ok(())
}
