//! `tinypass list`: display all entry names in a table.

use crate::cli::output;
use crate::cli::{open_service, prompt_password, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let service = open_service(cli)?;

    let password = prompt_password()?;
    let session = service.unlock(&password)?;
    drop(password);

    let names = session.names();
    let noun = if names.len() == 1 { "entry" } else { "entries" };
    output::info(&format!("{} {noun}", names.len()));
    output::print_entries_table(&names);

    Ok(())
}
