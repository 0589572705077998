use std::fmt::Display;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls, Xlsx};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{BankmapError, Result};
use crate::formats::{DateEncoding, FormatSpec, WorkbookEncoding};
use crate::models::RawRow;

/// The first sheet of a statement, as text rows, plus the SHA-256 of the
/// bytes it was decoded from.
#[derive(Debug)]
pub struct Statement {
    pub rows: Vec<RawRow>,
    pub sha256: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Render a cell as text. Numbers keep their literal form. Date-typed cells
/// follow the format's date encoding: `DD/MM/YYYY` for display dates, the
/// serial day count otherwise.
pub fn cell_text(cell: &Data, dates: DateEncoding) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dates {
            DateEncoding::Display if dt.is_datetime() => dt
                .as_datetime()
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| dt.as_f64().to_string()),
            _ => dt.as_f64().to_string(),
        },
    }
}

fn parse_error(path: &Path, err: impl Display) -> BankmapError {
    BankmapError::InputParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Flatten a range into rows indexed from cell A1.
///
/// calamine ranges start at the first used cell, so leading empty rows and
/// columns are padded back in.
fn range_to_rows(range: &Range<Data>, dates: DateEncoding) -> Vec<RawRow> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let first_col = first_col as usize;
    let width = first_col + range.width();

    let mut rows: Vec<RawRow> = (0..first_row).map(|_| vec![String::new(); width]).collect();
    for cells in range.rows() {
        let mut row = vec![String::new(); first_col];
        row.extend(cells.iter().map(|cell| cell_text(cell, dates)));
        rows.push(row);
    }
    rows
}

fn first_sheet<RS, R>(mut workbook: R, path: &Path) -> Result<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BankmapError::SheetNotFound {
            path: path.to_path_buf(),
        })?
        .map_err(|e| parse_error(path, e))?;
    if range.is_empty() {
        return Err(BankmapError::SheetNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(range)
}

// ---------------------------------------------------------------------------
// read_statement
// ---------------------------------------------------------------------------

/// Read a statement file once and decode its first sheet into text rows.
///
/// Any failure to read the file, including a path that does not exist, is an
/// `InputParse` error. The workbook handle is dropped before returning.
pub fn read_statement(file_path: &Path, spec: &FormatSpec) -> Result<Statement> {
    let data = std::fs::read(file_path).map_err(|e| parse_error(file_path, e))?;
    let sha256 = compute_checksum(&data);

    let range = match spec.encoding {
        WorkbookEncoding::Xlsx => {
            let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))
                .map_err(|e| parse_error(file_path, e))?;
            first_sheet(workbook, file_path)?
        }
        WorkbookEncoding::Xls => {
            let workbook: Xls<_> = open_workbook_from_rs(Cursor::new(data))
                .map_err(|e| parse_error(file_path, e))?;
            first_sheet(workbook, file_path)?
        }
    };

    let rows = range_to_rows(&range, spec.date_encoding);
    debug!(
        file = %file_path.display(),
        encoding = spec.encoding.label(),
        rows = rows.len(),
        "read first sheet"
    );
    Ok(Statement { rows, sha256 })
}

// ---------------------------------------------------------------------------
// Default input lookup
// ---------------------------------------------------------------------------

/// First file in `dir`, by name, whose name contains `.xls` (which also
/// matches `.xlsx`).
pub fn discover_input(dir: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(".xls"))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next().ok_or_else(|| {
        BankmapError::InputNotFound(format!("no spreadsheet (*.xls*) in {}", dir.display()))
    })
}
