use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::formats::{FormatSpec, ALL_FORMATS, DEFAULT_FORMAT};

fn column_summary(spec: &FormatSpec) -> String {
    let c = spec.columns;
    let mut summary = format!(
        "date={} inflow={} outflow={} memo={}",
        c.date, c.inflow, c.outflow, c.memo
    );
    if let Some(circuit) = c.circuit {
        summary.push_str(&format!(" circuit={circuit}"));
    }
    summary
}

pub fn list() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        "Key", "Name", "File", "Skip Top", "Skip Bottom", "Columns", "Excluded Circuit",
    ]);
    for format in ALL_FORMATS {
        let spec = format.spec();
        let key = if *format == DEFAULT_FORMAT {
            format!("{} (default)", format.key())
        } else {
            format.key().to_string()
        };
        table.add_row(vec![
            Cell::new(key),
            Cell::new(format.name()),
            Cell::new(spec.encoding.label()),
            Cell::new(spec.header_rows_to_skip),
            Cell::new(spec.footer_rows_to_skip),
            Cell::new(column_summary(&spec)),
            Cell::new(spec.excluded_circuit_value.unwrap_or("")),
        ]);
    }
    println!("{table}");
    Ok(())
}
