pub mod completions;
pub mod convert;
pub mod formats;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bankmap",
    version,
    about = "Convert bank and credit-card statement spreadsheets into a budgeting-ready CSV ledger."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub convert: ConvertArgs,

    /// Log more detail to stderr (-v info, -vv per-row debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Statement format: fineco or mastercard (default: fineco)
    #[arg(short = 't', long = "type", env = "BANKMAP_TYPE")]
    pub format: Option<String>,
    /// Spreadsheet to convert (default: first *.xls* file in the current directory)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// CSV file to write (default: remapped-bank-statement.csv)
    #[arg(short, long, env = "BANKMAP_OUTPUT")]
    pub output: Option<PathBuf>,
    /// Print the ledger instead of writing it
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported statement formats and their sheet layout.
    Formats,
    /// Print a shell completion script.
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}
