use crate::error::{BankmapError, Result};

// ---------------------------------------------------------------------------
// Format layout
// ---------------------------------------------------------------------------

/// Spreadsheet container a statement is exported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookEncoding {
    /// Office Open XML (`.xlsx`).
    Xlsx,
    /// Legacy BIFF (`.xls`).
    Xls,
}

impl WorkbookEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        }
    }
}

/// How the date column is stored in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEncoding {
    /// Already a display-ready `DD/MM/YYYY` string.
    Display,
    /// Integer day count from the 1899-12-30 spreadsheet epoch.
    Serial,
}

/// How the outflow column's sign is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignPolicy {
    /// Strip a leading `-` from the outflow; inflow comes from its own column.
    StripOnly,
    /// The outflow column carries every amount: negatives are charges,
    /// positives are refunds and move to inflow.
    RefundAware,
}

/// Zero-based source column for each semantic field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub inflow: usize,
    pub outflow: usize,
    pub memo: usize,
    pub circuit: Option<usize>,
}

impl ColumnMap {
    /// Minimum row width every retained row must have.
    pub fn width(&self) -> usize {
        [self.date, self.inflow, self.outflow, self.memo]
            .into_iter()
            .chain(self.circuit)
            .max()
            .map_or(0, |max| max + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub name: &'static str,
    pub header_rows_to_skip: usize,
    pub footer_rows_to_skip: usize,
    pub columns: ColumnMap,
    pub excluded_circuit_value: Option<&'static str>,
    pub date_encoding: DateEncoding,
    pub sign_policy: SignPolicy,
    pub encoding: WorkbookEncoding,
}

// ---------------------------------------------------------------------------
// Statement formats — enum dispatch, one variant per bank export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Fineco,
    Mastercard,
}

impl StatementFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Fineco => "fineco",
            Self::Mastercard => "mastercard",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fineco => "Fineco Bank current account",
            Self::Mastercard => "Mastercard credit card",
        }
    }

    pub fn spec(&self) -> FormatSpec {
        match self {
            Self::Fineco => FormatSpec {
                name: "fineco",
                header_rows_to_skip: 7,
                footer_rows_to_skip: 0,
                columns: ColumnMap {
                    date: 0,
                    inflow: 1,
                    outflow: 2,
                    memo: 4,
                    circuit: None,
                },
                excluded_circuit_value: None,
                date_encoding: DateEncoding::Display,
                sign_policy: SignPolicy::StripOnly,
                encoding: WorkbookEncoding::Xlsx,
            },
            // ATM withdrawals ("BANCOMAT") are already on the current account.
            Self::Mastercard => FormatSpec {
                name: "mastercard",
                header_rows_to_skip: 3,
                footer_rows_to_skip: 3,
                columns: ColumnMap {
                    date: 3,
                    inflow: 0,
                    outflow: 10,
                    memo: 5,
                    circuit: Some(8),
                },
                excluded_circuit_value: Some("BANCOMAT"),
                date_encoding: DateEncoding::Serial,
                sign_policy: SignPolicy::RefundAware,
                encoding: WorkbookEncoding::Xls,
            },
        }
    }
}

pub const ALL_FORMATS: &[StatementFormat] = &[StatementFormat::Fineco, StatementFormat::Mastercard];

pub const DEFAULT_FORMAT: StatementFormat = StatementFormat::Fineco;

pub fn get_by_key(key: &str) -> Option<StatementFormat> {
    ALL_FORMATS.iter().find(|f| f.key() == key).copied()
}

pub fn resolve(key: &str) -> Result<StatementFormat> {
    get_by_key(key).ok_or_else(|| BankmapError::UnsupportedFormat(key.to_string()))
}
