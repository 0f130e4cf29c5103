//! CLI module: argument parsing, shared prompts and the subcommands.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, TinyPassError};
use crate::vault::{FileStore, VaultService};

/// Minimum password length to prevent trivially weak master passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable that supplies the master password non-interactively.
pub const PASSWORD_ENV: &str = "TINYPASS_PASSWORD";

/// TinyPass CLI: a tiny local password vault.
#[derive(Parser)]
#[command(name = "tinypass", about = "A tiny local password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: from .tinypass.toml, else ./tinypass.vault)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master password
    Init,

    /// Add a new entry to the vault
    Add {
        /// Unique entry name (e.g. github)
        name: String,
        /// Entry description (omit for interactive prompt)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Print an entry's password
    Get {
        /// Entry name
        name: String,
        /// Print the description instead of the password
        #[arg(short, long)]
        description: bool,
    },

    /// List all entry names
    List,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `TINYPASS_PASSWORD` env var (scripting)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter the master password")
        .interact()
        .map_err(|e| TinyPassError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password and its confirmation (used by `init`).
///
/// Both values are returned as typed so the service can reject a
/// mismatch.  `TINYPASS_PASSWORD` supplies both when set.
pub fn prompt_new_password() -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    let (password, confirm) = match password_from_env() {
        Some(pw) => (pw.clone(), pw),
        None => {
            let password = Zeroizing::new(
                dialoguer::Password::new()
                    .with_prompt("Enter the master password")
                    .interact()
                    .map_err(|e| TinyPassError::CommandFailed(format!("password prompt: {e}")))?,
            );
            let confirm = Zeroizing::new(
                dialoguer::Password::new()
                    .with_prompt("Verify the master password")
                    .interact()
                    .map_err(|e| TinyPassError::CommandFailed(format!("password prompt: {e}")))?,
            );
            (password, confirm)
        }
    };

    check_password_strength(&password)?;
    Ok((password, confirm))
}

fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        Ok(mut pw) => {
            zeroize::Zeroize::zeroize(&mut pw);
            None
        }
        Err(_) => None,
    }
}

/// Enforce the minimum master password length.
pub fn check_password_strength(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TinyPassError::CommandFailed(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Resolve the vault file from the CLI arguments and settings.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.vault {
        Some(path) => cwd.join(path),
        None => settings.vault_path(&cwd),
    })
}

/// Build a `VaultService` over the vault file selected by the CLI.
pub fn open_service(cli: &Cli) -> Result<VaultService<FileStore>> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let path = vault_path(cli, &settings)?;
    Ok(VaultService::with_kdf_params(
        FileStore::new(path),
        settings.argon2_params(),
    ))
}
