use std::io;

use clap::Parser;
use tinypass::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => tinypass::cli::commands::init::execute(&cli),
        Commands::Add {
            ref name,
            ref description,
        } => tinypass::cli::commands::add::execute(&cli, name, description.as_deref()),
        Commands::Get {
            ref name,
            description,
        } => tinypass::cli::commands::get::execute(&cli, name, description),
        Commands::List => tinypass::cli::commands::list::execute(&cli),
        Commands::Completions { shell } => tinypass::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        tinypass::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the `-v` level.
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}
