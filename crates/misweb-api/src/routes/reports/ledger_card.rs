//! Ledger card report
//!
//! Sub-account transactions with running balances over a month range.
//! Period 13 (year-end adjustment) is selectable when enabled in config.

use axum::extract::Query;
use axum::response::{Html, Response};
use std::collections::HashMap;

use misweb_core::filters::required;
use misweb_core::{FilterOptions, LedgerStatement, PeriodFilter};
use misweb_export::{escape_html, format_amount, quote_code, CsvDocument, PageLayout, PrintDocument};

use crate::error::ApiError;
use crate::routes::{
    csv_response, empty_state, error_banner, num_cell, print_response, query_string,
    report_actions, text_cell,
};
use crate::AppState;

/// Ledger card filter page
pub async fn page_ledger_card(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    query: Query<HashMap<String, String>>,
) -> Html<String> {
    let options = FilterOptions::from_config(&state.config.filters);
    let selected_company = query.get("company").map(|s| s.as_str()).unwrap_or("");

    // Entity dropdown; on failure the list stays empty and the error is
    // shown inline, no retry
    let (company_options, fetch_error) = match state
        .source
        .entities(misweb_client::EntityKind::Companies)
        .await
    {
        Ok(companies) => {
            let opts: String = companies
                .iter()
                .map(|c| {
                    let selected = if c.id == selected_company { " selected" } else { "" };
                    format!(
                        r#"<option value='{}' data-name='{}'{}>{} - {}</option>"#,
                        escape_html(&c.id),
                        escape_html(&c.name),
                        selected,
                        escape_html(&c.id),
                        escape_html(&c.name)
                    )
                })
                .collect();
            (opts, String::new())
        }
        Err(e) => (String::new(), error_banner(&e.user_message())),
    };

    let year_options: String = options
        .year_options()
        .iter()
        .map(|y| format!("<option value='{}'>{}</option>", y, y))
        .collect();
    let start_month_options = month_options(&options, 1);
    let end_month_options = month_options(&options, 12);

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Ledger Card</h2>
        <p class='text-gray-500'>Running balances per sub-account for a GL code.</p></div>
        {fetch_error}
        <form id='ledger-filter' class='bg-white rounded-xl shadow-sm p-4 mb-4 flex flex-wrap gap-3 items-end'>
            <label class='block text-sm'>Company
                <select name='company' class='block mt-1 px-3 py-2 border rounded-lg min-w-[220px]'
                    onchange="this.form.company_name.value = this.selectedOptions[0] ? (this.selectedOptions[0].dataset.name || '') : ''">
                    <option value=''>All companies</option>
                    {company_options}
                </select>
            </label>
            <input type='hidden' name='company_name' value=''>
            <label class='block text-sm'>GL Code
                <input type='text' name='code' placeholder='e.g. 41010' class='block mt-1 px-3 py-2 border rounded-lg w-36'>
            </label>
            <label class='block text-sm'>Year
                <select name='year' class='block mt-1 px-3 py-2 border rounded-lg'>{year_options}</select>
            </label>
            <label class='block text-sm'>From Month
                <select name='start_month' class='block mt-1 px-3 py-2 border rounded-lg'>{start_month_options}</select>
            </label>
            <label class='block text-sm'>To Month
                <select name='end_month' class='block mt-1 px-3 py-2 border rounded-lg'>{end_month_options}</select>
            </label>
            <button hx-get='/reports/ledger-card/view' hx-target='#report-content' hx-include='#ledger-filter'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>View</button>
        </form>
        <div id='report-content' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Select filters and press View.</p>
        </div>"#,
        fetch_error = fetch_error,
        company_options = company_options,
        year_options = year_options,
        start_month_options = start_month_options,
        end_month_options = end_month_options,
    );

    Html(crate::page_response(&headers, "Ledger Card", "/reports/ledger-card", &inner_content))
}

fn month_options(options: &FilterOptions, selected: u32) -> String {
    options
        .month_options(true)
        .iter()
        .map(|m| {
            let sel = if *m == selected { " selected" } else { "" };
            format!("<option value='{}'{}>{}</option>", m, sel, m)
        })
        .collect()
}

/// Ledger card table partial
pub async fn view_ledger_card(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Html<String> {
    let (code, filter) = match parse_filters(&state, &query) {
        Ok(parsed) => parsed,
        Err(e) => return Html(error_banner(&e.message())),
    };

    let rows = match state
        .source
        .ledger_card(&code, filter.year, filter.start_month, filter.end_month)
        .await
    {
        Ok(rows) => rows,
        // Selection and filter state stay untouched on upstream failure
        Err(e) => return Html(error_banner(&e.user_message())),
    };

    let statement = LedgerStatement::build(&rows);

    if statement.is_empty() {
        return Html(empty_state("No transactions for the selected GL code and period."));
    }

    // Export links carry the validated values so CSV/print reproduce
    // exactly this view
    let export_query = query_string(&[
        ("company_name", query.get("company_name").map(|s| s.as_str()).unwrap_or("")),
        ("code", &code),
        ("year", &filter.year.to_string()),
        ("start_month", &filter.start_month.to_string()),
        ("end_month", &filter.end_month.to_string()),
    ]);

    let mut html = report_actions("/reports/ledger-card", &export_query);
    html.push_str(&render_ledger_table(&statement));
    Html(html)
}

/// CSV download
pub async fn csv_ledger_card(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let (code, filter) = parse_filters(&state, &query)?;
    let rows = state
        .source
        .ledger_card(&code, filter.year, filter.start_month, filter.end_month)
        .await?;
    let statement = LedgerStatement::build(&rows);

    let mut doc = CsvDocument::new();
    doc.title(&format!("Ledger Card - {}", code));
    if let Some(company) = query.get("company_name").filter(|s| !s.is_empty()) {
        doc.title(company);
    }
    doc.title(&format!("Period: {}", filter.label()));
    doc.blank();
    doc.header(&["Sub Account", "Doc No", "Date", "Narration", "Debit", "Credit", "Balance"]);

    for group in &statement.groups {
        doc.row(&[
            quote_code(&group.sub_ac),
            String::new(),
            String::new(),
            misweb_export::escape_field(&format!("{} - Opening Balance", group.sub_ac_name)),
            String::new(),
            String::new(),
            format!("{:.2}", group.opening_balance),
        ]);
        for line in &group.lines {
            doc.row(&[
                String::new(),
                quote_code(&line.doc_no),
                misweb_export::escape_field(&line.doc_date),
                misweb_export::escape_field(&line.narration),
                format!("{:.2}", line.dr_amt),
                format!("{:.2}", line.cr_amt),
                format!("{:.2}", line.running_balance),
            ]);
        }
        doc.row(&[
            misweb_export::escape_field(&format!("Total {}", group.sub_ac)),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", group.dr_total),
            format!("{:.2}", group.cr_total),
            format!("{:.2}", group.closing_balance),
        ]);
    }
    if !statement.is_empty() {
        doc.row(&[
            "Grand Total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", statement.dr_total),
            format!("{:.2}", statement.cr_total),
            format!("{:.2}", statement.closing_total),
        ]);
    }

    Ok(csv_response(&format!("ledger-card-{}-{}.csv", code, filter.year), doc))
}

/// Print document
pub async fn print_ledger_card(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let (code, filter) = parse_filters(&state, &query)?;
    let rows = state
        .source
        .ledger_card(&code, filter.year, filter.start_month, filter.end_month)
        .await?;
    let statement = LedgerStatement::build(&rows);

    if statement.is_empty() {
        return Ok(print_response(None));
    }

    let mut doc = PrintDocument::new(format!("Ledger Card - {}", code), PageLayout::A4Landscape)
        .sub_heading(format!("Period: {}", filter.label()))
        .table(render_ledger_table(&statement))
        .signature("Prepared by")
        .signature("Checked by")
        .signature("Accountant");
    if let Some(company) = query.get("company_name").filter(|s| !s.is_empty()) {
        doc = doc.sub_heading(company.clone());
    }

    Ok(print_response(Some(doc)))
}

// ==================== Helpers ====================

fn parse_filters(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<(String, PeriodFilter), ApiError> {
    let options = FilterOptions::from_config(&state.config.filters);
    let code = required(params, "code")?.to_string();
    let filter = PeriodFilter::from_params(params, &options, true)?;
    Ok((code, filter))
}

/// Shared table markup for the on-screen partial and the print document
fn render_ledger_table(statement: &LedgerStatement) -> String {
    let mut html = String::from(
        r#"<table class='report'><thead><tr><th>Doc No</th><th>Date</th><th>Narration</th><th>Debit</th><th>Credit</th><th>Balance</th></tr></thead><tbody>"#,
    );

    for group in &statement.groups {
        html.push_str(&format!(
            r#"<tr><td class='group-head' colspan='5'>{} - {}</td><td class='num group-head'>{}</td></tr>"#,
            escape_html(&group.sub_ac),
            escape_html(&group.sub_ac_name),
            format_amount(group.opening_balance),
        ));
        for line in &group.lines {
            html.push_str("<tr>");
            html.push_str(&text_cell(&line.doc_no));
            html.push_str(&text_cell(&line.doc_date));
            html.push_str(&text_cell(&line.narration));
            html.push_str(&num_cell(line.dr_amt));
            html.push_str(&num_cell(line.cr_amt));
            html.push_str(&num_cell(line.running_balance));
            html.push_str("</tr>");
        }
        html.push_str(&format!(
            r#"<tr class='subtotal'><td colspan='3'>Total {}</td>{}{}{}</tr>"#,
            escape_html(&group.sub_ac),
            num_cell(group.dr_total),
            num_cell(group.cr_total),
            num_cell(group.closing_balance),
        ));
    }

    html.push_str(&format!(
        r#"<tr class='grand-total'><td colspan='3'>Grand Total</td>{}{}{}</tr>"#,
        num_cell(statement.dr_total),
        num_cell(statement.cr_total),
        num_cell(statement.closing_total),
    ));
    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use misweb_client::LedgerRow;

    fn row(sub_ac: &str, opening: f64, dr: f64, cr: f64) -> LedgerRow {
        LedgerRow {
            gl_cd: "41010".to_string(),
            sub_ac: sub_ac.to_string(),
            sub_ac_name: format!("Sub {}", sub_ac),
            doc_no: "JV/0042".to_string(),
            doc_date: "2026-01-20".to_string(),
            narration: "Meter rentals, Jan".to_string(),
            dr_amt: dr,
            cr_amt: cr,
            opening_balance: opening,
        }
    }

    #[test]
    fn test_table_contains_running_and_subtotal() {
        let rows = vec![row("A", 100.0, 50.0, 0.0), row("A", 100.0, 0.0, 30.0)];
        let statement = LedgerStatement::build(&rows);
        let html = render_ledger_table(&statement);

        assert!(html.contains("150.00"));
        assert!(html.contains("120.00"));
        assert!(html.contains("Total A"));
        assert!(html.contains("Grand Total"));
    }

    #[test]
    fn test_csv_shape() {
        let rows = vec![row("A", 100.0, 50.0, 0.0)];
        let statement = LedgerStatement::build(&rows);

        let mut doc = CsvDocument::new();
        doc.header(&["Sub Account", "Doc No"]);
        for group in &statement.groups {
            for line in &group.lines {
                doc.row(&[quote_code(&group.sub_ac), quote_code(&line.doc_no)]);
            }
        }
        let text = String::from_utf8(doc.into_bytes().unwrap()).unwrap();
        assert!(text.contains("\"JV/0042\""));
    }

    #[test]
    fn test_empty_statement_csv_is_no_content() {
        let doc = CsvDocument::new();
        let response = csv_response("ledger.csv", doc);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
