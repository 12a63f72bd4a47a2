//! Physical verification report
//!
//! Annual stock-count reconciliation grouped by stock book, with surplus
//! and shortage totals per book and overall.

use axum::extract::Query;
use axum::response::{Html, Response};
use std::collections::HashMap;

use misweb_core::{FilterOptions, VerificationSheet, YearFilter};
use misweb_export::{escape_html, format_amount, quote_code, CsvDocument, PageLayout, PrintDocument};

use crate::error::ApiError;
use crate::routes::{
    csv_response, empty_state, error_banner, num_cell, print_response, query_string,
    report_actions, text_cell,
};
use crate::AppState;

/// Physical verification filter page
pub async fn page_verification(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> Html<String> {
    let options = FilterOptions::from_config(&state.config.filters);
    let year_options: String = options
        .year_options()
        .iter()
        .map(|y| format!("<option value='{}'>{}</option>", y, y))
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Physical Verification</h2>
        <p class='text-gray-500'>Annual stock verification sheet by stock book.</p></div>
        <form id='phv-filter' class='bg-white rounded-xl shadow-sm p-4 mb-4 flex flex-wrap gap-3 items-end'>
            <label class='block text-sm'>Year
                <select name='year' class='block mt-1 px-3 py-2 border rounded-lg'>{year_options}</select>
            </label>
            <button hx-get='/reports/verification/view' hx-target='#report-content' hx-include='#phv-filter'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>View</button>
        </form>
        <div id='report-content' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Select a year and press View.</p>
        </div>"#,
        year_options = year_options,
    );

    Html(crate::page_response(
        &headers,
        "Physical Verification",
        "/reports/verification",
        &inner_content,
    ))
}

/// Verification sheet table partial
pub async fn view_verification(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Html<String> {
    let options = FilterOptions::from_config(&state.config.filters);
    let year = match YearFilter::from_params(&query, &options) {
        Ok(filter) => filter.year,
        Err(e) => return Html(error_banner(&e.user_message())),
    };

    let rows = match state.source.verification_sheet(year).await {
        Ok(rows) => rows,
        Err(e) => return Html(error_banner(&e.user_message())),
    };

    if rows.is_empty() {
        return Html(empty_state("No verification lines recorded for the selected year."));
    }

    let sheet = VerificationSheet::build(&rows);
    let export_query = query_string(&[("year", &year.to_string())]);

    let mut html = report_actions("/reports/verification", &export_query);
    html.push_str(&render_verification_table(&sheet));
    Html(html)
}

/// CSV download
pub async fn csv_verification(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let options = FilterOptions::from_config(&state.config.filters);
    let year = YearFilter::from_params(&query, &options)?.year;
    let rows = state.source.verification_sheet(year).await?;
    let sheet = VerificationSheet::build(&rows);

    let mut doc = CsvDocument::new();
    doc.title(&format!("Annual Physical Verification - {}", year));
    doc.blank();
    doc.header(&[
        "Stock Book",
        "Material Code",
        "Material Name",
        "Unit",
        "Book Qty",
        "Verified Qty",
        "Surplus",
        "Shortage",
    ]);

    for book in &sheet.books {
        for line in &book.lines {
            doc.row(&[
                misweb_export::escape_field(&book.stock_book),
                quote_code(&line.material_code),
                misweb_export::escape_field(&line.material_name),
                misweb_export::escape_field(&line.unit),
                format!("{:.2}", line.book_qty),
                format!("{:.2}", line.verified_qty),
                format!("{:.2}", line.surplus_amount),
                format!("{:.2}", line.shortage_amount),
            ]);
        }
        doc.row(&[
            misweb_export::escape_field(&format!("Total {}", book.stock_book)),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", book.surplus_total),
            format!("{:.2}", book.shortage_total),
        ]);
    }
    if !sheet.is_empty() {
        doc.row(&[
            "Grand Total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", sheet.surplus_total),
            format!("{:.2}", sheet.shortage_total),
        ]);
        doc.row(&[
            "Net Surplus/(Shortage)".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", sheet.net_amount()),
        ]);
    }

    Ok(csv_response(&format!("physical-verification-{}.csv", year), doc))
}

/// Print document
pub async fn print_verification(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let options = FilterOptions::from_config(&state.config.filters);
    let year = YearFilter::from_params(&query, &options)?.year;
    let rows = state.source.verification_sheet(year).await?;

    if rows.is_empty() {
        return Ok(print_response(None));
    }

    let sheet = VerificationSheet::build(&rows);
    let doc = PrintDocument::new(
        format!("Annual Physical Verification - {}", year),
        PageLayout::A4Portrait,
    )
    .sub_heading("Stores stock count reconciliation")
    .table(render_verification_table(&sheet))
    .signature("Stores Officer")
    .signature("Verification Officer")
    .signature("Accountant");

    Ok(print_response(Some(doc)))
}

// ==================== Helpers ====================

fn render_verification_table(sheet: &VerificationSheet) -> String {
    let mut html = String::from(
        r#"<table class='report'><thead><tr><th>Material Code</th><th>Material Name</th><th>Unit</th><th>Book Qty</th><th>Verified Qty</th><th>Surplus</th><th>Shortage</th></tr></thead><tbody>"#,
    );

    for book in &sheet.books {
        html.push_str(&format!(
            r#"<tr><td class='group-head' colspan='7'>Stock Book: {}</td></tr>"#,
            escape_html(&book.stock_book),
        ));
        for line in &book.lines {
            html.push_str("<tr>");
            html.push_str(&text_cell(&line.material_code));
            html.push_str(&text_cell(&line.material_name));
            html.push_str(&text_cell(&line.unit));
            html.push_str(&num_cell(line.book_qty));
            html.push_str(&num_cell(line.verified_qty));
            html.push_str(&num_cell(line.surplus_amount));
            html.push_str(&num_cell(line.shortage_amount));
            html.push_str("</tr>");
        }
        html.push_str(&format!(
            r#"<tr class='subtotal'><td colspan='5'>Total {}</td>{}{}</tr>"#,
            escape_html(&book.stock_book),
            num_cell(book.surplus_total),
            num_cell(book.shortage_total),
        ));
    }

    html.push_str(&format!(
        r#"<tr class='grand-total'><td colspan='5'>Grand Total</td>{}{}</tr>"#,
        num_cell(sheet.surplus_total),
        num_cell(sheet.shortage_total),
    ));
    html.push_str(&format!(
        r#"<tr class='grand-total'><td colspan='6'>Net Surplus/(Shortage)</td><td class='num'>{}</td></tr>"#,
        format_amount(sheet.net_amount()),
    ));
    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use misweb_client::VerificationRow;

    fn line(book: &str, code: &str, surplus: f64, shortage: f64) -> VerificationRow {
        VerificationRow {
            material_code: code.to_string(),
            material_name: "ACSR Conductor".to_string(),
            stock_book: book.to_string(),
            unit: "m".to_string(),
            book_qty: 500.0,
            verified_qty: 480.0,
            surplus_amount: surplus,
            shortage_amount: shortage,
        }
    }

    #[test]
    fn test_table_net_line() {
        let rows = vec![line("SB1", "0042", 100.0, 0.0), line("SB2", "0043", 0.0, 30.0)];
        let sheet = VerificationSheet::build(&rows);
        let html = render_verification_table(&sheet);

        assert!(html.contains("Stock Book: SB1"));
        assert!(html.contains("Net Surplus/(Shortage)"));
        assert!(html.contains("70.00"));
    }

    #[test]
    fn test_year_filter_rejects_garbage() {
        let options = FilterOptions { year_span: 20, thirteenth_period: true };
        let params: HashMap<String, String> =
            [("year", "twenty")].iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        assert!(YearFilter::from_params(&params, &options).is_err());

        let params: HashMap<String, String> = HashMap::new();
        assert!(YearFilter::from_params(&params, &options).is_err());
    }

    #[test]
    fn test_material_codes_keep_leading_zeros_in_csv() {
        let rows = vec![line("SB1", "0042", 0.0, 0.0)];
        let sheet = VerificationSheet::build(&rows);

        let mut doc = CsvDocument::new();
        for book in &sheet.books {
            for l in &book.lines {
                doc.row(&[quote_code(&l.material_code)]);
            }
        }
        let text = String::from_utf8(doc.into_bytes().unwrap()).unwrap();
        assert!(text.contains("\"0042\""));
    }
}
