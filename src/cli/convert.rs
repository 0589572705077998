use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};
use tracing::info;

use crate::cli::ConvertArgs;
use crate::error::Result;
use crate::exporter::write_ledger;
use crate::formats::{resolve, StatementFormat};
use crate::importer::{discover_input, read_statement};
use crate::models::{LedgerRow, LEDGER_HEADER};
use crate::normalizer::normalize;
use crate::settings::load_settings;

/// Read, normalize and return the ledger for one statement file.
pub fn convert_file(format: StatementFormat, input: &Path) -> Result<Vec<LedgerRow>> {
    let spec = format.spec();
    let statement = read_statement(input, &spec)?;
    info!(
        format = spec.name,
        file = %input.display(),
        sha256 = %statement.sha256,
        rows = statement.rows.len(),
        "parsing statement"
    );
    normalize(&statement.rows, &spec)
}

fn print_ledger(rows: &[LedgerRow]) {
    if rows.is_empty() {
        println!("No transactions found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(LEDGER_HEADER[..4].to_vec());
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.date),
            Cell::new(row.inflow.green()),
            Cell::new(row.outflow.red()),
            Cell::new(&row.memo),
        ]);
    }
    println!("{} transactions\n{table}", rows.len());
}

pub fn run(args: ConvertArgs) -> Result<()> {
    // An explicit format is validated before the settings file or any input
    // is touched.
    let explicit = args.format.as_deref().map(resolve).transpose()?;
    let settings = load_settings()?;
    let format = match explicit {
        Some(format) => format,
        None => resolve(&settings.default_format)?,
    };

    let input = match args.file {
        Some(path) => path,
        None => discover_input(Path::new("."))?,
    };
    let ledger = convert_file(format, &input)?;

    if args.dry_run {
        print_ledger(&ledger);
        return Ok(());
    }

    let output = args.output.unwrap_or_else(|| PathBuf::from(settings.output));
    write_ledger(&output, &ledger)?;
    info!(file = %output.display(), rows = ledger.len(), "ledger written");
    println!("Remapped data saved to: {}", output.display());
    Ok(())
}
