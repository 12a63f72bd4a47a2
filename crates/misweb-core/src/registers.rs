//! Register-style reports: PIV register, physical verification, solar
//! settlements
//!
//! These group on a single key with per-group and grand totals. Rows are
//! stable-sorted on the group key first, so in-group server order survives.

use serde::Serialize;

use misweb_client::{PivRow, SolarRow, VerificationRow};

use crate::grouping::runs_by;

// ==================== PIV Register ====================

/// Vouchers of one department
#[derive(Debug, Clone, Serialize)]
pub struct DeptGroup {
    pub dept_id: String,
    pub dept_name: String,
    pub vouchers: Vec<PivRow>,
    pub count: usize,
    pub amount_total: f64,
}

/// PIV register grouped by department
#[derive(Debug, Clone, Serialize, Default)]
pub struct PivRegister {
    pub departments: Vec<DeptGroup>,
    pub count: usize,
    pub amount_total: f64,
}

impl PivRegister {
    pub fn build(rows: &[PivRow]) -> Self {
        let mut sorted: Vec<&PivRow> = rows.iter().collect();
        sorted.sort_by(|a, b| a.dept_id.cmp(&b.dept_id));

        let mut register = PivRegister::default();
        for (dept_id, range) in runs_by(&sorted, |r| r.dept_id.clone()) {
            let run = &sorted[range];
            let vouchers: Vec<PivRow> = run.iter().map(|r| (*r).clone()).collect();
            let amount_total: f64 = vouchers.iter().map(|v| v.amount).sum();

            register.count += vouchers.len();
            register.amount_total += amount_total;
            register.departments.push(DeptGroup {
                dept_id,
                dept_name: run[0].dept_name.clone(),
                count: vouchers.len(),
                amount_total,
                vouchers,
            });
        }
        register
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }
}

// ==================== Physical Verification ====================

/// Verification lines of one stock book
#[derive(Debug, Clone, Serialize)]
pub struct StockBookGroup {
    pub stock_book: String,
    pub lines: Vec<VerificationRow>,
    pub surplus_total: f64,
    pub shortage_total: f64,
}

/// Annual physical verification sheet grouped by stock book
#[derive(Debug, Clone, Serialize, Default)]
pub struct VerificationSheet {
    pub books: Vec<StockBookGroup>,
    pub surplus_total: f64,
    pub shortage_total: f64,
}

impl VerificationSheet {
    pub fn build(rows: &[VerificationRow]) -> Self {
        let mut sorted: Vec<&VerificationRow> = rows.iter().collect();
        sorted.sort_by(|a, b| a.stock_book.cmp(&b.stock_book));

        let mut sheet = VerificationSheet::default();
        for (stock_book, range) in runs_by(&sorted, |r| r.stock_book.clone()) {
            let run = &sorted[range];
            let lines: Vec<VerificationRow> = run.iter().map(|r| (*r).clone()).collect();
            let surplus_total: f64 = lines.iter().map(|l| l.surplus_amount).sum();
            let shortage_total: f64 = lines.iter().map(|l| l.shortage_amount).sum();

            sheet.surplus_total += surplus_total;
            sheet.shortage_total += shortage_total;
            sheet.books.push(StockBookGroup {
                stock_book,
                lines,
                surplus_total,
                shortage_total,
            });
        }
        sheet
    }

    /// Net reconciliation result across all stock books
    pub fn net_amount(&self) -> f64 {
        self.surplus_total - self.shortage_total
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

// ==================== Solar Settlements ====================

/// Settlements of one calendar month
#[derive(Debug, Clone, Serialize)]
pub struct MonthGroup {
    /// YYYY-MM taken from the settlement date
    pub month: String,
    pub lines: Vec<SolarRow>,
    pub units_total: f64,
    pub amount_total: f64,
}

/// Solar payment settlements grouped by settlement month
#[derive(Debug, Clone, Serialize, Default)]
pub struct SolarSettlement {
    pub months: Vec<MonthGroup>,
    pub units_total: f64,
    pub amount_total: f64,
}

impl SolarSettlement {
    pub fn build(rows: &[SolarRow]) -> Self {
        let mut sorted: Vec<&SolarRow> = rows.iter().collect();
        sorted.sort_by(|a, b| settle_month(a).cmp(&settle_month(b)));

        let mut settlement = SolarSettlement::default();
        for (month, range) in runs_by(&sorted, |r| settle_month(r).to_string()) {
            let run = &sorted[range];
            let lines: Vec<SolarRow> = run.iter().map(|r| (*r).clone()).collect();
            let units_total: f64 = lines.iter().map(|l| l.units).sum();
            let amount_total: f64 = lines.iter().map(|l| l.amount).sum();

            settlement.units_total += units_total;
            settlement.amount_total += amount_total;
            settlement.months.push(MonthGroup {
                month,
                lines,
                units_total,
                amount_total,
            });
        }
        settlement
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// YYYY-MM prefix of a settlement date, or the raw value when malformed
fn settle_month(row: &SolarRow) -> &str {
    if row.settle_date.len() >= 7 {
        &row.settle_date[..7]
    } else {
        &row.settle_date
    }
}
