use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BankmapError, Result};
use crate::models::{LedgerRow, LEDGER_HEADER};

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger.csv".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

fn write_csv(path: &Path, rows: &[LedgerRow]) -> std::io::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(LEDGER_HEADER)?;
    for row in rows {
        wtr.write_record(row.fields())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the ledger header and rows to `path`, replacing any existing file.
///
/// Rows go to a sibling temp file first and are renamed into place, so the
/// destination is either fully written or untouched.
pub fn write_ledger(path: &Path, rows: &[LedgerRow]) -> Result<()> {
    let tmp = temp_path(path);
    let result = write_csv(&tmp, rows).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(source) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(BankmapError::OutputWrite {
            path: path.to_path_buf(),
            source,
        });
    }
    debug!(file = %path.display(), rows = rows.len(), "wrote ledger");
    Ok(())
}
