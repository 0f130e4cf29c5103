//! `tinypass get`: decrypt and print one entry.

use crate::cli::{open_service, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str, show_description: bool) -> Result<()> {
    let service = open_service(cli)?;

    let password = prompt_password()?;
    let session = service.unlock(&password)?;
    drop(password);

    // Print only the requested field so the output can be piped.
    let entry = session.reveal(name)?;
    if show_description {
        println!("{}", entry.description.as_str());
    } else {
        println!("{}", entry.password.as_str());
    }

    Ok(())
}
