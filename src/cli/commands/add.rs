//! `tinypass add`: add a new entry to the vault.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_service, prompt_password, Cli};
use crate::errors::{Result, TinyPassError};

/// Execute the `add` command.
pub fn execute(cli: &Cli, name: &str, description: Option<&str>) -> Result<()> {
    let mut service = open_service(cli)?;

    // Unlock first so a wrong password or a taken name fails before we
    // ask for anything else.
    let password = prompt_password()?;
    let mut session = service.unlock(&password)?;
    drop(password);

    if session.vault().find_entry(name).is_some() {
        return Err(TinyPassError::DuplicateName(name.to_string()));
    }

    let description = match description {
        Some(d) => Zeroizing::new(d.to_string()),
        None => Zeroizing::new(
            dialoguer::Input::<String>::new()
                .with_prompt("Enter description")
                .allow_empty(true)
                .interact_text()
                .map_err(|e| TinyPassError::CommandFailed(format!("input prompt: {e}")))?,
        ),
    };

    // The secret comes from piped stdin or a hidden prompt.
    let secret = if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut *buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Enter the password for {name}"))
                .interact()
                .map_err(|e| TinyPassError::CommandFailed(format!("password prompt: {e}")))?,
        )
    };

    let vault = service.add_entry(&mut session, name, &description, &secret)?;

    output::success(&format!(
        "Entry '{}' added ({} total)",
        name,
        vault.len()
    ));
    output::tip(&format!("Run `tinypass get {name}` to read it back."));

    Ok(())
}
