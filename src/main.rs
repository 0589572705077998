mod cli;
mod error;
mod exporter;
mod formats;
mod importer;
mod models;
mod normalizer;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logger(verbose: u8) {
    let default = match verbose {
        0 => "bankmap=warn",
        1 => "bankmap=info",
        _ => "bankmap=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Some(Commands::Formats) => cli::formats::list(),
        Some(Commands::Completions { shell }) => cli::completions::run(shell),
        None => cli::convert::run(cli.convert),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
