//! Income & expenditure pivot
//!
//! Rows are cells of an account x cost-centre matrix. They are sorted by
//! ordinal string comparison on (catflag, title_cd, catcode, account) and
//! grouped on the full key; the sort order is load-bearing for the merged
//! header cells in the rendered table.

use serde::Serialize;
use std::collections::BTreeSet;

use misweb_client::IncomeExpenditureRow;

use crate::grouping::runs_by;

/// One pivoted account line with a value per cost-centre column
#[derive(Debug, Clone, Serialize)]
pub struct PivotLine {
    pub catflag: String,
    pub title_cd: String,
    pub catcode: String,
    pub account: String,
    pub account_name: String,
    /// Aligned with [`IncomeExpenditureStatement::cost_centres`]
    pub by_cost_centre: Vec<f64>,
    pub total: f64,
}

/// A partition (income or expenditure) with its column totals
#[derive(Debug, Clone, Serialize, Default)]
pub struct PivotSection {
    pub lines: Vec<PivotLine>,
    pub column_totals: Vec<f64>,
    pub total: f64,
}

impl PivotSection {
    fn push(&mut self, line: PivotLine) {
        if self.column_totals.is_empty() {
            self.column_totals = vec![0.0; line.by_cost_centre.len()];
        }
        for (total, value) in self.column_totals.iter_mut().zip(&line.by_cost_centre) {
            *total += value;
        }
        self.total += line.total;
        self.lines.push(line);
    }
}

/// The full income & expenditure statement
#[derive(Debug, Clone, Serialize, Default)]
pub struct IncomeExpenditureStatement {
    /// Sorted cost-centre column headers
    pub cost_centres: Vec<String>,
    pub income: PivotSection,
    pub expenditure: PivotSection,
    /// Signed per-column sum of both partitions
    pub surplus_by_cost_centre: Vec<f64>,
    pub surplus_total: f64,
}

impl IncomeExpenditureStatement {
    pub fn build(rows: &[IncomeExpenditureRow]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }

        let cost_centres: Vec<String> = rows
            .iter()
            .map(|r| r.cost_center.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut sorted: Vec<&IncomeExpenditureRow> = rows.iter().collect();
        sorted.sort_by(|a, b| {
            (&a.catflag, &a.title_cd, &a.catcode, &a.account)
                .cmp(&(&b.catflag, &b.title_cd, &b.catcode, &b.account))
        });

        let mut statement = Self {
            cost_centres: cost_centres.clone(),
            income: PivotSection::default(),
            expenditure: PivotSection::default(),
            surplus_by_cost_centre: vec![0.0; cost_centres.len()],
            surplus_total: 0.0,
        };

        let key = |r: &&IncomeExpenditureRow| {
            (r.catflag.clone(), r.title_cd.clone(), r.catcode.clone(), r.account.clone())
        };

        for ((catflag, title_cd, catcode, account), range) in runs_by(&sorted, key) {
            let run = &sorted[range];
            let mut by_cost_centre = vec![0.0; cost_centres.len()];
            for row in run {
                // cost_centres holds every distinct value, so the lookup
                // cannot miss; skip defensively anyway
                if let Ok(col) = cost_centres.binary_search(&row.cost_center) {
                    by_cost_centre[col] += row.actual;
                }
            }
            let total: f64 = by_cost_centre.iter().sum();

            let line = PivotLine {
                catflag: catflag.clone(),
                title_cd,
                catcode,
                account,
                account_name: run[0].account_name.clone(),
                by_cost_centre,
                total,
            };

            if catflag == "I" {
                statement.income.push(line);
            } else {
                statement.expenditure.push(line);
            }
        }

        if statement.income.column_totals.is_empty() {
            statement.income.column_totals = vec![0.0; cost_centres.len()];
        }
        if statement.expenditure.column_totals.is_empty() {
            statement.expenditure.column_totals = vec![0.0; cost_centres.len()];
        }

        for col in 0..cost_centres.len() {
            statement.surplus_by_cost_centre[col] =
                statement.income.column_totals[col] + statement.expenditure.column_totals[col];
        }
        statement.surplus_total = statement.income.total + statement.expenditure.total;

        statement
    }

    pub fn is_empty(&self) -> bool {
        self.income.lines.is_empty() && self.expenditure.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(catflag: &str, title: &str, cat: &str, account: &str, cc: &str, actual: f64) -> IncomeExpenditureRow {
        IncomeExpenditureRow {
            catflag: catflag.to_string(),
            title_cd: title.to_string(),
            catcode: cat.to_string(),
            account: account.to_string(),
            account_name: format!("Account {}", account),
            cost_center: cc.to_string(),
            actual,
        }
    }

    #[test]
    fn test_surplus_scenario() {
        // Expenditure arrives already signed
        let rows = vec![
            row("I", "10", "101", "41010", "CC1", 1000.0),
            row("X", "20", "201", "51010", "CC1", -600.0),
        ];
        let statement = IncomeExpenditureStatement::build(&rows);

        assert_eq!(statement.income.total, 1000.0);
        assert_eq!(statement.expenditure.total, -600.0);
        assert_eq!(statement.surplus_total, 400.0);
        assert_eq!(statement.surplus_by_cost_centre, vec![400.0]);
    }

    #[test]
    fn test_cells_pivot_into_columns() {
        let rows = vec![
            row("I", "10", "101", "41010", "CC2", 300.0),
            row("I", "10", "101", "41010", "CC1", 200.0),
            row("I", "10", "101", "41010", "CC1", 50.0),
        ];
        let statement = IncomeExpenditureStatement::build(&rows);

        assert_eq!(statement.cost_centres, vec!["CC1", "CC2"]);
        assert_eq!(statement.income.lines.len(), 1);
        let line = &statement.income.lines[0];
        assert_eq!(line.by_cost_centre, vec![250.0, 300.0]);
        assert_eq!(line.total, 550.0);
    }

    #[test]
    fn test_lines_sorted_ordinal() {
        let rows = vec![
            row("I", "20", "201", "42000", "CC1", 1.0),
            row("I", "10", "102", "41020", "CC1", 1.0),
            row("I", "10", "101", "41010", "CC1", 1.0),
        ];
        let statement = IncomeExpenditureStatement::build(&rows);

        let keys: Vec<(&str, &str)> = statement
            .income
            .lines
            .iter()
            .map(|l| (l.title_cd.as_str(), l.account.as_str()))
            .collect();
        assert_eq!(keys, vec![("10", "41010"), ("10", "41020"), ("20", "42000")]);
    }

    #[test]
    fn test_column_totals_sum_lines() {
        let rows = vec![
            row("I", "10", "101", "41010", "CC1", 100.0),
            row("I", "10", "102", "41020", "CC1", 40.0),
            row("I", "10", "102", "41020", "CC2", 5.0),
            row("E", "30", "301", "51010", "CC2", -70.0),
        ];
        let statement = IncomeExpenditureStatement::build(&rows);

        assert_eq!(statement.income.column_totals, vec![140.0, 5.0]);
        assert_eq!(statement.expenditure.column_totals, vec![0.0, -70.0]);
        assert_eq!(statement.surplus_by_cost_centre, vec![140.0, -65.0]);
        assert_eq!(statement.surplus_total, 75.0);
    }

    #[test]
    fn test_non_income_flags_are_expenditure() {
        let rows = vec![
            row("E", "30", "301", "51010", "CC1", -10.0),
            row("X", "40", "401", "52010", "CC1", -20.0),
        ];
        let statement = IncomeExpenditureStatement::build(&rows);
        assert!(statement.income.lines.is_empty());
        assert_eq!(statement.expenditure.lines.len(), 2);
        assert_eq!(statement.income.column_totals, vec![0.0]);
    }

    #[test]
    fn test_empty_rows() {
        let statement = IncomeExpenditureStatement::build(&[]);
        assert!(statement.is_empty());
        assert!(statement.cost_centres.is_empty());
    }
}
