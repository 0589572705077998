/// One sheet row, each cell rendered to text, indexed by sheet column.
pub type RawRow = Vec<String>;

pub const LEDGER_HEADER: [&str; 6] = ["Date", "Inflow", "Outflow", "Memo", "Payee", "Category"];

/// Normalized transaction ready for CSV export.
///
/// `payee` and `category` are always empty; they are left for the budgeting
/// tool to fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub date: String,
    pub inflow: String,
    pub outflow: String,
    pub memo: String,
    pub payee: String,
    pub category: String,
}

impl LedgerRow {
    pub fn new(date: String, inflow: String, outflow: String, memo: String) -> Self {
        Self {
            date,
            inflow,
            outflow,
            memo,
            payee: String::new(),
            category: String::new(),
        }
    }

    /// Fields in `LEDGER_HEADER` order.
    pub fn fields(&self) -> [&str; 6] {
        [
            self.date.as_str(),
            self.inflow.as_str(),
            self.outflow.as_str(),
            self.memo.as_str(),
            self.payee.as_str(),
            self.category.as_str(),
        ]
    }
}
