use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{BankmapError, Result};
use crate::formats::{DateEncoding, FormatSpec, SignPolicy};
use crate::models::{LedgerRow, RawRow};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert a spreadsheet serial day count to `DD/MM/YYYY`.
///
/// Day 0 is 1899-12-30, which absorbs the 1900 leap year bug.
pub fn excel_serial_to_date(serial: i64) -> Option<String> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_signed(Duration::try_days(serial)?)?;
    Some(date.format("%d/%m/%Y").to_string())
}

/// Drop one leading `-`, if any.
pub fn strip_sign(raw: &str) -> &str {
    raw.strip_prefix('-').unwrap_or(raw)
}

fn normalize_date(raw: &str, spec: &FormatSpec, row: usize) -> Result<String> {
    match spec.date_encoding {
        DateEncoding::Display => Ok(raw.to_string()),
        DateEncoding::Serial => raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(excel_serial_to_date)
            .ok_or_else(|| BankmapError::InvalidDateValue {
                format: spec.name,
                row,
                value: raw.to_string(),
            }),
    }
}

/// Returns `(inflow, outflow)` with the outflow as a positive magnitude.
fn normalize_amounts(inflow: &str, outflow: &str, policy: SignPolicy) -> (String, String) {
    match policy {
        SignPolicy::StripOnly => (inflow.to_string(), strip_sign(outflow).to_string()),
        SignPolicy::RefundAware => {
            if outflow.is_empty() {
                (inflow.to_string(), String::new())
            } else if let Some(charge) = outflow.strip_prefix('-') {
                (String::new(), charge.to_string())
            } else {
                // Positive entries in the charge column are refunds.
                (outflow.to_string(), String::new())
            }
        }
    }
}

/// Row indices between the header and footer skip counts. Empty when the
/// sheet is too short to have any.
fn data_window(total: usize, spec: &FormatSpec) -> std::ops::Range<usize> {
    let end = total.saturating_sub(spec.footer_rows_to_skip);
    spec.header_rows_to_skip.min(end)..end
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Apply a format's policy to the raw sheet rows.
///
/// Rows outside the `[header, total - footer)` window are discarded; when that
/// window is empty the result is empty rather than an error. Output order is
/// input order.
pub fn normalize(rows: &[RawRow], spec: &FormatSpec) -> Result<Vec<LedgerRow>> {
    let window = data_window(rows.len(), spec);
    if window.is_empty() {
        warn!(
            format = spec.name,
            rows = rows.len(),
            "sheet has no rows between the {} header and {} footer rows",
            spec.header_rows_to_skip,
            spec.footer_rows_to_skip
        );
        return Ok(Vec::new());
    }

    let cols = spec.columns;
    let width = cols.width();
    let trimmed = rows.len() - window.len();
    let mut ledger = Vec::with_capacity(window.len());
    let mut excluded = 0usize;

    for (index, row) in rows.iter().enumerate().take(window.end).skip(window.start) {
        let sheet_row = index + 1;
        if row.len() < width {
            return Err(BankmapError::MalformedRow {
                format: spec.name,
                row: sheet_row,
                column: width - 1,
                width: row.len(),
            });
        }

        let circuit = cols.circuit.map_or("", |c| row[c].as_str());
        if spec.excluded_circuit_value.is_some_and(|v| v == circuit) {
            debug!(row = sheet_row, circuit, "excluded");
            excluded += 1;
            continue;
        }

        let date = normalize_date(&row[cols.date], spec, sheet_row)?;
        let (inflow, outflow) =
            normalize_amounts(&row[cols.inflow], &row[cols.outflow], spec.sign_policy);
        let memo = row[cols.memo].clone();

        debug!(
            row = sheet_row,
            "Date: {date}, Inflow: {inflow}, Outflow: {outflow}, Memo: {memo}, Circuit: {circuit}"
        );
        ledger.push(LedgerRow::new(date, inflow, outflow, memo));
    }

    info!(
        format = spec.name,
        read = rows.len(),
        trimmed,
        excluded,
        kept = ledger.len(),
        "normalized statement"
    );
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{ColumnMap, StatementFormat, WorkbookEncoding};

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn blank_rows(n: usize, width: usize) -> Vec<RawRow> {
        (0..n).map(|_| vec![String::new(); width]).collect()
    }

    fn mastercard_row(date: &str, memo: &str, circuit: &str, amount: &str) -> RawRow {
        let mut r = vec![String::new(); 11];
        r[3] = date.to_string();
        r[5] = memo.to_string();
        r[8] = circuit.to_string();
        r[10] = amount.to_string();
        r
    }

    fn mastercard_sheet(data: Vec<RawRow>) -> Vec<RawRow> {
        let mut rows = blank_rows(3, 11);
        rows.extend(data);
        rows.extend(blank_rows(3, 11));
        rows
    }

    fn fineco_sheet() -> Vec<RawRow> {
        let mut rows = vec![
            row(&["Conto Corrente"]),
            row(&["Intestatario", "Mario Rossi"]),
            row(&[]),
            row(&["Periodo", "01/07/2024 - 31/07/2024"]),
            row(&[]),
            row(&[]),
            row(&["Data", "Entrate", "Uscite", "Descrizione", "Descrizione Completa"]),
        ];
        rows.push(row(&["22/07/2024", "", "-1500", "Bonifico", "Test 1"]));
        rows.push(row(&["21/07/2024", "", "-10", "Pagamento", "Test 2"]));
        rows.push(row(&["21/07/2024", "", "-100", "Pagamento", "Test 3"]));
        rows.push(row(&["16/07/2024", "1000", "", "Stipendio", "Income 1"]));
        rows
    }

    fn passthrough_spec() -> FormatSpec {
        FormatSpec {
            name: "ledger",
            header_rows_to_skip: 0,
            footer_rows_to_skip: 0,
            columns: ColumnMap {
                date: 0,
                inflow: 1,
                outflow: 2,
                memo: 3,
                circuit: None,
            },
            excluded_circuit_value: None,
            date_encoding: DateEncoding::Display,
            sign_policy: SignPolicy::StripOnly,
            encoding: WorkbookEncoding::Xlsx,
        }
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(0), Some("30/12/1899".to_string()));
        assert_eq!(excel_serial_to_date(1), Some("31/12/1899".to_string()));
        assert_eq!(excel_serial_to_date(45495), Some("22/07/2024".to_string()));
        assert_eq!(excel_serial_to_date(45667), Some("10/01/2025".to_string()));
    }

    #[test]
    fn test_strip_sign() {
        assert_eq!(strip_sign("-1500"), "1500");
        assert_eq!(strip_sign("1500"), "1500");
        assert_eq!(strip_sign("--5"), "-5");
        assert_eq!(strip_sign(""), "");
    }

    #[test]
    fn test_fineco_statement() {
        let spec = StatementFormat::Fineco.spec();
        let ledger = normalize(&fineco_sheet(), &spec).unwrap();
        let fields: Vec<[&str; 6]> = ledger.iter().map(|r| r.fields()).collect();
        assert_eq!(
            fields,
            vec![
                ["22/07/2024", "", "1500", "Test 1", "", ""],
                ["21/07/2024", "", "10", "Test 2", "", ""],
                ["21/07/2024", "", "100", "Test 3", "", ""],
                ["16/07/2024", "1000", "", "Income 1", "", ""],
            ]
        );
    }

    #[test]
    fn test_data_window() {
        let spec = StatementFormat::Mastercard.spec();
        assert_eq!(data_window(10, &spec), 3..7);
        assert_eq!(data_window(6, &spec), 3..3);
        assert!(data_window(4, &spec).is_empty());
        assert!(data_window(0, &spec).is_empty());

        let spec = StatementFormat::Fineco.spec();
        assert_eq!(data_window(11, &spec), 7..11);
        assert!(data_window(7, &spec).is_empty());
    }

    #[test]
    fn test_short_sheet_yields_empty_ledger() {
        let fineco = StatementFormat::Fineco.spec();
        assert!(normalize(&blank_rows(7, 5), &fineco).unwrap().is_empty());
        assert!(normalize(&blank_rows(3, 5), &fineco).unwrap().is_empty());
        assert!(normalize(&[], &fineco).unwrap().is_empty());

        let mastercard = StatementFormat::Mastercard.spec();
        assert!(normalize(&blank_rows(6, 11), &mastercard).unwrap().is_empty());
        assert!(normalize(&blank_rows(4, 11), &mastercard).unwrap().is_empty());
    }

    #[test]
    fn test_mastercard_trims_header_and_footer() {
        let spec = StatementFormat::Mastercard.spec();
        let rows = mastercard_sheet(vec![
            mastercard_row("45495", "AMAZON", "VISA", "-20.00"),
            mastercard_row("45496", "NETFLIX", "VISA", "-12.99"),
        ]);
        let ledger = normalize(&rows, &spec).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].fields(), ["22/07/2024", "", "20.00", "AMAZON", "", ""]);
        assert_eq!(ledger[1].fields(), ["23/07/2024", "", "12.99", "NETFLIX", "", ""]);
    }

    #[test]
    fn test_mastercard_excludes_atm_withdrawals() {
        let spec = StatementFormat::Mastercard.spec();
        let rows = mastercard_sheet(vec![
            mastercard_row("45495", "ATM", "BANCOMAT", "-50.00"),
            mastercard_row("45495", "SHOP", "bancomat", "-5.00"),
            mastercard_row("45495", "SHOP 2", "MAESTRO", "-6.00"),
            mastercard_row("45495", "SHOP 3", "", "-7.00"),
        ]);
        let ledger = normalize(&rows, &spec).unwrap();
        let memos: Vec<&str> = ledger.iter().map(|r| r.memo.as_str()).collect();
        assert_eq!(memos, vec!["SHOP", "SHOP 2", "SHOP 3"]);
    }

    #[test]
    fn test_excluded_row_skips_date_validation() {
        let spec = StatementFormat::Mastercard.spec();
        let rows = mastercard_sheet(vec![mastercard_row("n/a", "ATM", "BANCOMAT", "-50.00")]);
        assert!(normalize(&rows, &spec).unwrap().is_empty());
    }

    #[test]
    fn test_mastercard_refund_moves_to_inflow() {
        let spec = StatementFormat::Mastercard.spec();
        let rows = mastercard_sheet(vec![mastercard_row("45495", "REFUND", "VISA", "5.00")]);
        let ledger = normalize(&rows, &spec).unwrap();
        assert_eq!(ledger[0].inflow, "5.00");
        assert_eq!(ledger[0].outflow, "");
    }

    #[test]
    fn test_mastercard_charge_clears_inflow_column() {
        let spec = StatementFormat::Mastercard.spec();
        let mut r = mastercard_row("45495", "SHOP", "VISA", "-9.90");
        r[0] = "4.00".to_string();
        let ledger = normalize(&mastercard_sheet(vec![r]), &spec).unwrap();
        assert_eq!(ledger[0].inflow, "");
        assert_eq!(ledger[0].outflow, "9.90");
    }

    #[test]
    fn test_fineco_positive_outflow_is_not_a_refund() {
        let spec = StatementFormat::Fineco.spec();
        let mut rows = blank_rows(7, 5);
        rows.push(row(&["01/08/2024", "", "25", "", "Fee"]));
        let ledger = normalize(&rows, &spec).unwrap();
        assert_eq!(ledger[0].inflow, "");
        assert_eq!(ledger[0].outflow, "25");
    }

    #[test]
    fn test_inflow_and_outflow_never_both_set() {
        let spec = StatementFormat::Mastercard.spec();
        let rows = mastercard_sheet(vec![
            mastercard_row("45495", "A", "VISA", "-1.00"),
            mastercard_row("45495", "B", "VISA", "2.00"),
            mastercard_row("45495", "C", "VISA", ""),
            mastercard_row("45495", "D", "VISA", "-"),
        ]);
        for r in normalize(&rows, &spec).unwrap() {
            assert!(r.inflow.is_empty() || r.outflow.is_empty(), "{r:?}");
        }
        for r in normalize(&fineco_sheet(), &StatementFormat::Fineco.spec()).unwrap() {
            assert!(r.inflow.is_empty() || r.outflow.is_empty(), "{r:?}");
        }
    }

    #[test]
    fn test_invalid_serial_date_fails() {
        let spec = StatementFormat::Mastercard.spec();
        let rows = mastercard_sheet(vec![
            mastercard_row("45495", "OK", "VISA", "-1.00"),
            mastercard_row("22/07/2024", "BAD", "VISA", "-1.00"),
        ]);
        let err = normalize(&rows, &spec).unwrap_err();
        match err {
            BankmapError::InvalidDateValue { format, row, value } => {
                assert_eq!(format, "mastercard");
                assert_eq!(row, 5);
                assert_eq!(value, "22/07/2024");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_serial_is_rejected() {
        let spec = StatementFormat::Mastercard.spec();
        let rows = mastercard_sheet(vec![mastercard_row("45495.5", "X", "VISA", "-1.00")]);
        assert!(matches!(
            normalize(&rows, &spec),
            Err(BankmapError::InvalidDateValue { .. })
        ));
    }

    #[test]
    fn test_narrow_data_row_is_malformed() {
        let spec = StatementFormat::Fineco.spec();
        let mut rows = blank_rows(7, 1);
        rows.push(row(&["22/07/2024", "", "-1"]));
        match normalize(&rows, &spec).unwrap_err() {
            BankmapError::MalformedRow { row, column, width, .. } => {
                assert_eq!(row, 8);
                assert_eq!(column, 4);
                assert_eq!(width, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_normalizing_a_ledger_is_a_no_op() {
        let spec = StatementFormat::Fineco.spec();
        let ledger = normalize(&fineco_sheet(), &spec).unwrap();
        let as_rows: Vec<RawRow> = ledger
            .iter()
            .map(|r| r.fields().iter().map(|f| f.to_string()).collect())
            .collect();
        let again = normalize(&as_rows, &passthrough_spec()).unwrap();
        assert_eq!(again, ledger);
    }
}
