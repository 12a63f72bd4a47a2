//! Income & expenditure report
//!
//! Region-detailed pivot: one row per account, one column per cost centre,
//! split into income and expenditure sections with a surplus/deficit row.
//! Title cells merge over consecutive rows sharing a title code; the merge
//! relies on the ordinal sort performed in misweb-core.

use axum::extract::Query;
use axum::response::{Html, Response};
use std::collections::HashMap;

use misweb_core::{leading_spans, FilterOptions, IncomeExpenditureStatement, MonthFilter, PivotSection};
use misweb_export::{escape_html, quote_code, CsvDocument, PageLayout, PrintDocument};

use crate::error::ApiError;
use crate::routes::{
    csv_response, empty_state, error_banner, num_cell, print_response, query_string,
    report_actions,
};
use crate::AppState;

/// Income & expenditure filter page
pub async fn page_income_expenditure(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> Html<String> {
    let options = FilterOptions::from_config(&state.config.filters);

    let year_options: String = options
        .year_options()
        .iter()
        .map(|y| format!("<option value='{}'>{}</option>", y, y))
        .collect();
    let month_options: String = options
        .month_options(false)
        .iter()
        .map(|m| format!("<option value='{}'>{}</option>", m, m))
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Income &amp; Expenditure</h2>
        <p class='text-gray-500'>Region detailed, by account and cost centre.</p></div>
        <form id='ie-filter' class='bg-white rounded-xl shadow-sm p-4 mb-4 flex flex-wrap gap-3 items-end'>
            <label class='block text-sm'>Year
                <select name='year' class='block mt-1 px-3 py-2 border rounded-lg'>{year_options}</select>
            </label>
            <label class='block text-sm'>Month
                <select name='month' class='block mt-1 px-3 py-2 border rounded-lg'>{month_options}</select>
            </label>
            <button hx-get='/reports/income-expenditure/view' hx-target='#report-content' hx-include='#ie-filter'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>View</button>
        </form>
        <div id='report-content' class='bg-white rounded-xl shadow-sm p-6 overflow-x-auto'>
            <p class='text-gray-500 text-center'>Select filters and press View.</p>
        </div>"#,
        year_options = year_options,
        month_options = month_options,
    );

    Html(crate::page_response(
        &headers,
        "Income & Expenditure",
        "/reports/income-expenditure",
        &inner_content,
    ))
}

/// Income & expenditure table partial
pub async fn view_income_expenditure(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Html<String> {
    let options = FilterOptions::from_config(&state.config.filters);
    let filter = match MonthFilter::from_params(&query, &options) {
        Ok(filter) => filter,
        Err(e) => return Html(error_banner(&e.user_message())),
    };

    let rows = match state.source.income_expenditure(filter.year, filter.month).await {
        Ok(rows) => rows,
        Err(e) => return Html(error_banner(&e.user_message())),
    };

    if rows.is_empty() {
        return Html(empty_state("No income or expenditure postings for the selected month."));
    }

    let statement = IncomeExpenditureStatement::build(&rows);
    let export_query = query_string(&[
        ("year", &filter.year.to_string()),
        ("month", &filter.month.to_string()),
    ]);

    let mut html = report_actions("/reports/income-expenditure", &export_query);
    html.push_str(&render_pivot_table(&statement));
    Html(html)
}

/// CSV download
pub async fn csv_income_expenditure(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let options = FilterOptions::from_config(&state.config.filters);
    let filter = MonthFilter::from_params(&query, &options)?;
    let rows = state.source.income_expenditure(filter.year, filter.month).await?;
    let statement = IncomeExpenditureStatement::build(&rows);

    let mut doc = CsvDocument::new();
    doc.title("Income & Expenditure - Region Detailed");
    doc.title(&format!("Period: {}", filter.label()));
    doc.blank();

    let mut header: Vec<&str> = vec!["Section", "Title", "Catcode", "Account", "Account Name"];
    for cc in &statement.cost_centres {
        header.push(cc);
    }
    header.push("Total");
    doc.header(&header);

    write_section_csv(&mut doc, "Income", &statement.income);
    write_section_csv(&mut doc, "Expenditure", &statement.expenditure);

    if !statement.is_empty() {
        let mut cells = vec![
            "Surplus/Deficit".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ];
        for value in &statement.surplus_by_cost_centre {
            cells.push(format!("{:.2}", value));
        }
        cells.push(format!("{:.2}", statement.surplus_total));
        doc.row(&cells);
    }

    Ok(csv_response(
        &format!("income-expenditure-{}-{:02}.csv", filter.year, filter.month),
        doc,
    ))
}

fn write_section_csv(doc: &mut CsvDocument, label: &str, section: &PivotSection) {
    for line in &section.lines {
        let mut cells = vec![
            label.to_string(),
            quote_code(&line.title_cd),
            quote_code(&line.catcode),
            quote_code(&line.account),
            misweb_export::escape_field(&line.account_name),
        ];
        for value in &line.by_cost_centre {
            cells.push(format!("{:.2}", value));
        }
        cells.push(format!("{:.2}", line.total));
        doc.row(&cells);
    }
    if !section.lines.is_empty() {
        let mut cells = vec![
            format!("Total {}", label),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ];
        for value in &section.column_totals {
            cells.push(format!("{:.2}", value));
        }
        cells.push(format!("{:.2}", section.total));
        doc.row(&cells);
    }
}

/// Print document (widest report in the portal, hence A3 landscape)
pub async fn print_income_expenditure(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let options = FilterOptions::from_config(&state.config.filters);
    let filter = MonthFilter::from_params(&query, &options)?;
    let rows = state.source.income_expenditure(filter.year, filter.month).await?;

    if rows.is_empty() {
        return Ok(print_response(None));
    }

    let statement = IncomeExpenditureStatement::build(&rows);
    let doc = PrintDocument::new("Income & Expenditure Statement", PageLayout::A3Landscape)
        .sub_heading("Region Detailed")
        .sub_heading(format!("Period: {}", filter.label()))
        .table(render_pivot_table(&statement))
        .signature("Prepared by")
        .signature("Checked by")
        .signature("Chief Accountant");

    Ok(print_response(Some(doc)))
}

// ==================== Rendering ====================

fn render_pivot_table(statement: &IncomeExpenditureStatement) -> String {
    let mut html = String::from("<table class='report'><thead><tr><th>Title</th><th>Catcode</th><th>Account</th><th>Account Name</th>");
    for cc in &statement.cost_centres {
        html.push_str(&format!("<th>{}</th>", escape_html(cc)));
    }
    html.push_str("<th>Total</th></tr></thead><tbody>");

    render_section(&mut html, "Income", &statement.income, statement.cost_centres.len());
    render_section(&mut html, "Expenditure", &statement.expenditure, statement.cost_centres.len());

    html.push_str(&format!(
        "<tr class='grand-total'><td colspan='4'>Surplus / Deficit</td>{}{}</tr>",
        statement
            .surplus_by_cost_centre
            .iter()
            .map(|v| num_cell(*v))
            .collect::<String>(),
        num_cell(statement.surplus_total),
    ));
    html.push_str("</tbody></table>");
    html
}

fn render_section(html: &mut String, label: &str, section: &PivotSection, column_count: usize) {
    if section.lines.is_empty() {
        return;
    }

    html.push_str(&format!(
        "<tr><td class='group-head' colspan='{}'>{}</td></tr>",
        5 + column_count,
        label
    ));

    // Merge consecutive rows sharing a title code into one spanning cell;
    // the core sort guarantees they are adjacent
    let spans = leading_spans(&section.lines, |l| l.title_cd.clone());

    for (line, span) in section.lines.iter().zip(&spans) {
        html.push_str("<tr>");
        if *span > 0 {
            html.push_str(&format!(
                "<td class='group-head' rowspan='{}'>{}</td>",
                span,
                escape_html(&line.title_cd)
            ));
        }
        html.push_str(&format!("<td>{}</td>", escape_html(&line.catcode)));
        html.push_str(&format!("<td>{}</td>", escape_html(&line.account)));
        html.push_str(&format!("<td>{}</td>", escape_html(&line.account_name)));
        for value in &line.by_cost_centre {
            html.push_str(&num_cell(*value));
        }
        html.push_str(&num_cell(line.total));
        html.push_str("</tr>");
    }

    html.push_str(&format!(
        "<tr class='subtotal'><td colspan='4'>Total {}</td>{}{}</tr>",
        label,
        section.column_totals.iter().map(|v| num_cell(*v)).collect::<String>(),
        num_cell(section.total),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use misweb_client::IncomeExpenditureRow;

    fn row(catflag: &str, title: &str, account: &str, cc: &str, actual: f64) -> IncomeExpenditureRow {
        IncomeExpenditureRow {
            catflag: catflag.to_string(),
            title_cd: title.to_string(),
            catcode: format!("{}1", title),
            account: account.to_string(),
            account_name: format!("Account {}", account),
            cost_center: cc.to_string(),
            actual,
        }
    }

    #[test]
    fn test_table_has_sections_and_surplus() {
        let rows = vec![
            row("I", "10", "41010", "CC1", 1000.0),
            row("X", "30", "51010", "CC1", -600.0),
        ];
        let statement = IncomeExpenditureStatement::build(&rows);
        let html = render_pivot_table(&statement);

        assert!(html.contains(">Income<"));
        assert!(html.contains(">Expenditure<"));
        assert!(html.contains("Total Income"));
        assert!(html.contains("Surplus / Deficit"));
        assert!(html.contains("400.00"));
    }

    #[test]
    fn test_title_cells_merge_with_rowspan() {
        let rows = vec![
            row("I", "10", "41010", "CC1", 1.0),
            row("I", "10", "41020", "CC1", 2.0),
            row("I", "20", "42010", "CC1", 3.0),
        ];
        let statement = IncomeExpenditureStatement::build(&rows);
        let html = render_pivot_table(&statement);

        assert!(html.contains("rowspan='2'"));
        // Title 10 renders once, not once per row
        assert_eq!(html.matches(">10</td>").count(), 1);
    }

    #[test]
    fn test_csv_section_rows() {
        let rows = vec![
            row("I", "10", "41010", "CC1", 1000.0),
            row("E", "30", "51010", "CC2", -600.0),
        ];
        let statement = IncomeExpenditureStatement::build(&rows);

        let mut doc = CsvDocument::new();
        write_section_csv(&mut doc, "Income", &statement.income);
        write_section_csv(&mut doc, "Expenditure", &statement.expenditure);
        assert_eq!(doc.data_rows(), 4);

        let text = String::from_utf8(doc.into_bytes().unwrap()).unwrap();
        assert!(text.contains("Total Income"));
        assert!(text.contains("-600.00"));
    }
}
