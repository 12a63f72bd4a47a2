//! Running-balance ledger statements
//!
//! Rows are processed strictly in server order. Each sub-account run opens
//! a group seeded with that run's own opening balance — the balance is
//! authoritative from the backend per row, never carried over from the
//! previous group. Within a group the running balance accumulates as
//! `running += dr - cr`.

use serde::Serialize;

use misweb_client::LedgerRow;

use crate::grouping::runs_by;

/// One transaction line with its running balance
#[derive(Debug, Clone, Serialize)]
pub struct LedgerLine {
    pub doc_no: String,
    pub doc_date: String,
    pub narration: String,
    pub dr_amt: f64,
    pub cr_amt: f64,
    pub running_balance: f64,
}

/// All lines of one sub-account plus its subtotals
#[derive(Debug, Clone, Serialize)]
pub struct SubAccountGroup {
    pub sub_ac: String,
    pub sub_ac_name: String,
    pub opening_balance: f64,
    pub lines: Vec<LedgerLine>,
    pub dr_total: f64,
    pub cr_total: f64,
    /// Equals opening_balance + dr_total - cr_total
    pub closing_balance: f64,
}

/// A complete ledger card statement
#[derive(Debug, Clone, Serialize, Default)]
pub struct LedgerStatement {
    pub groups: Vec<SubAccountGroup>,
    pub dr_total: f64,
    pub cr_total: f64,
    /// Sum of every group's closing balance
    pub closing_total: f64,
}

impl LedgerStatement {
    /// Aggregate rows in server order
    pub fn build(rows: &[LedgerRow]) -> Self {
        let mut statement = LedgerStatement::default();

        for (sub_ac, range) in runs_by(rows, |r| r.sub_ac.clone()) {
            let run = &rows[range];
            let opening_balance = run[0].opening_balance;
            let sub_ac_name = run[0].sub_ac_name.clone();

            let mut running = opening_balance;
            let mut dr_total = 0.0;
            let mut cr_total = 0.0;
            let mut lines = Vec::with_capacity(run.len());

            for row in run {
                running += row.dr_amt - row.cr_amt;
                dr_total += row.dr_amt;
                cr_total += row.cr_amt;
                lines.push(LedgerLine {
                    doc_no: row.doc_no.clone(),
                    doc_date: row.doc_date.clone(),
                    narration: row.narration.clone(),
                    dr_amt: row.dr_amt,
                    cr_amt: row.cr_amt,
                    running_balance: running,
                });
            }

            statement.dr_total += dr_total;
            statement.cr_total += cr_total;
            statement.closing_total += running;
            statement.groups.push(SubAccountGroup {
                sub_ac,
                sub_ac_name,
                opening_balance,
                lines,
                dr_total,
                cr_total,
                closing_balance: running,
            });
        }

        log::debug!(
            "ledger statement: {} rows -> {} sub-accounts",
            rows.len(),
            statement.groups.len()
        );
        statement
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sub_ac: &str, opening: f64, dr: f64, cr: f64) -> LedgerRow {
        LedgerRow {
            gl_cd: "41010".to_string(),
            sub_ac: sub_ac.to_string(),
            sub_ac_name: format!("Sub account {}", sub_ac),
            doc_no: "JV/001".to_string(),
            doc_date: "2026-01-15".to_string(),
            narration: "posting".to_string(),
            dr_amt: dr,
            cr_amt: cr,
            opening_balance: opening,
        }
    }

    #[test]
    fn test_running_balance_scenario() {
        // Opening 100, Dr 50 -> 150, then Cr 30 -> 120
        let rows = vec![row("A", 100.0, 50.0, 0.0), row("A", 100.0, 0.0, 30.0)];
        let statement = LedgerStatement::build(&rows);

        assert_eq!(statement.groups.len(), 1);
        let group = &statement.groups[0];
        assert_eq!(group.lines[0].running_balance, 150.0);
        assert_eq!(group.lines[1].running_balance, 120.0);
        assert_eq!(group.dr_total, 50.0);
        assert_eq!(group.cr_total, 30.0);
        assert_eq!(group.closing_balance, 120.0);
    }

    #[test]
    fn test_closing_equals_opening_plus_net() {
        let rows = vec![
            row("A", 250.0, 10.0, 0.0),
            row("A", 250.0, 0.0, 75.5),
            row("A", 250.0, 42.25, 0.0),
            row("B", -40.0, 0.0, 60.0),
            row("B", -40.0, 100.0, 0.0),
        ];
        let statement = LedgerStatement::build(&rows);

        for group in &statement.groups {
            assert_eq!(
                group.closing_balance,
                group.opening_balance + group.dr_total - group.cr_total
            );
            if let Some(last) = group.lines.last() {
                assert_eq!(last.running_balance, group.closing_balance);
            }
        }
    }

    #[test]
    fn test_opening_balance_not_carried_forward() {
        // B's opening comes from its own first row, not from A's closing
        let rows = vec![row("A", 100.0, 500.0, 0.0), row("B", 7.0, 1.0, 0.0)];
        let statement = LedgerStatement::build(&rows);

        assert_eq!(statement.groups[0].closing_balance, 600.0);
        assert_eq!(statement.groups[1].opening_balance, 7.0);
        assert_eq!(statement.groups[1].closing_balance, 8.0);
    }

    #[test]
    fn test_grand_total_is_sum_of_subtotals() {
        let rows = vec![
            row("A", 10.0, 5.0, 2.0),
            row("B", 20.0, 1.0, 0.5),
            row("C", -5.0, 0.0, 3.0),
        ];
        let statement = LedgerStatement::build(&rows);

        let dr: f64 = statement.groups.iter().map(|g| g.dr_total).sum();
        let cr: f64 = statement.groups.iter().map(|g| g.cr_total).sum();
        let closing: f64 = statement.groups.iter().map(|g| g.closing_balance).sum();
        assert_eq!(statement.dr_total, dr);
        assert_eq!(statement.cr_total, cr);
        assert_eq!(statement.closing_total, closing);
    }

    #[test]
    fn test_server_order_is_preserved() {
        // A sub-account reappearing later in the feed opens a new group;
        // correctness depends on the backend's ORDER BY
        let rows = vec![row("A", 1.0, 1.0, 0.0), row("B", 2.0, 1.0, 0.0), row("A", 3.0, 1.0, 0.0)];
        let statement = LedgerStatement::build(&rows);
        assert_eq!(statement.groups.len(), 3);
        assert_eq!(statement.groups[2].opening_balance, 3.0);
    }

    #[test]
    fn test_empty_rows() {
        let statement = LedgerStatement::build(&[]);
        assert!(statement.is_empty());
        assert_eq!(statement.dr_total, 0.0);
    }
}
