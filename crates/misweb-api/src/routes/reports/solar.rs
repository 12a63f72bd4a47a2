//! Solar settlement report
//!
//! Solar payment settlements over a date range, grouped by settlement
//! month with unit and amount totals.

use axum::extract::Query;
use axum::response::{Html, Response};
use std::collections::HashMap;

use misweb_core::{DateRangeFilter, SolarSettlement};
use misweb_export::{escape_html, quote_code, CsvDocument, PageLayout, PrintDocument};

use crate::error::ApiError;
use crate::routes::{
    csv_response, empty_state, error_banner, num_cell, print_response, query_string,
    report_actions, text_cell,
};
use crate::AppState;

/// Solar settlements filter page
pub async fn page_solar(headers: axum::http::HeaderMap) -> Html<String> {
    let inner_content = r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Solar Settlements</h2>
        <p class='text-gray-500'>Solar payment settlements grouped by month.</p></div>
        <form id='solar-filter' class='bg-white rounded-xl shadow-sm p-4 mb-4 flex flex-wrap gap-3 items-end'>
            <label class='block text-sm'>From
                <input type='date' name='from' class='block mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <label class='block text-sm'>To
                <input type='date' name='to' class='block mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <button hx-get='/reports/solar/view' hx-target='#report-content' hx-include='#solar-filter'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>View</button>
        </form>
        <div id='report-content' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Select a date range and press View.</p>
        </div>"#
        .to_string();

    Html(crate::page_response(&headers, "Solar Settlements", "/reports/solar", &inner_content))
}

/// Solar settlements table partial
pub async fn view_solar(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Html<String> {
    let range = match DateRangeFilter::from_params(&query) {
        Ok(range) => range,
        Err(e) => return Html(error_banner(&e.user_message())),
    };

    let rows = match state.source.solar_settlement(range.from, range.to).await {
        Ok(rows) => rows,
        Err(e) => return Html(error_banner(&e.user_message())),
    };

    if rows.is_empty() {
        return Html(empty_state("No settlements in the selected date range."));
    }

    let settlement = SolarSettlement::build(&rows);
    let export_query = query_string(&[
        ("from", &range.from.to_string()),
        ("to", &range.to.to_string()),
    ]);

    let mut html = report_actions("/reports/solar", &export_query);
    html.push_str(&render_solar_table(&settlement));
    Html(html)
}

/// CSV download
pub async fn csv_solar(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let range = DateRangeFilter::from_params(&query)?;
    let rows = state.source.solar_settlement(range.from, range.to).await?;
    let settlement = SolarSettlement::build(&rows);

    let mut doc = CsvDocument::new();
    doc.title("Solar Payment Settlements");
    doc.title(&format!("Period: {}", range.label()));
    doc.blank();
    doc.header(&["Month", "Account No", "Consumer", "Settle Date", "Units", "Amount"]);

    for month in &settlement.months {
        for line in &month.lines {
            doc.row(&[
                misweb_export::escape_field(&month.month),
                quote_code(&line.account_no),
                misweb_export::escape_field(&line.consumer_name),
                misweb_export::escape_field(&line.settle_date),
                format!("{:.2}", line.units),
                format!("{:.2}", line.amount),
            ]);
        }
        doc.row(&[
            misweb_export::escape_field(&format!("Total {}", month.month)),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", month.units_total),
            format!("{:.2}", month.amount_total),
        ]);
    }
    if !settlement.is_empty() {
        doc.row(&[
            "Grand Total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", settlement.units_total),
            format!("{:.2}", settlement.amount_total),
        ]);
    }

    Ok(csv_response(
        &format!("solar-settlements-{}-{}.csv", range.from, range.to),
        doc,
    ))
}

/// Print document
pub async fn print_solar(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let range = DateRangeFilter::from_params(&query)?;
    let rows = state.source.solar_settlement(range.from, range.to).await?;

    if rows.is_empty() {
        return Ok(print_response(None));
    }

    let settlement = SolarSettlement::build(&rows);
    let doc = PrintDocument::new("Solar Payment Settlements", PageLayout::A4Portrait)
        .sub_heading(format!("Period: {}", range.label()))
        .table(render_solar_table(&settlement))
        .signature("Prepared by")
        .signature("Authorized by");

    Ok(print_response(Some(doc)))
}

// ==================== Helpers ====================

fn render_solar_table(settlement: &SolarSettlement) -> String {
    let mut html = String::from(
        r#"<table class='report'><thead><tr><th>Account No</th><th>Consumer</th><th>Settle Date</th><th>Units</th><th>Amount</th></tr></thead><tbody>"#,
    );

    for month in &settlement.months {
        html.push_str(&format!(
            r#"<tr><td class='group-head' colspan='5'>{}</td></tr>"#,
            escape_html(&month.month),
        ));
        for line in &month.lines {
            html.push_str("<tr>");
            html.push_str(&text_cell(&line.account_no));
            html.push_str(&text_cell(&line.consumer_name));
            html.push_str(&text_cell(&line.settle_date));
            html.push_str(&num_cell(line.units));
            html.push_str(&num_cell(line.amount));
            html.push_str("</tr>");
        }
        html.push_str(&format!(
            r#"<tr class='subtotal'><td colspan='3'>Total {}</td>{}{}</tr>"#,
            escape_html(&month.month),
            num_cell(month.units_total),
            num_cell(month.amount_total),
        ));
    }

    html.push_str(&format!(
        r#"<tr class='grand-total'><td colspan='3'>Grand Total</td>{}{}</tr>"#,
        num_cell(settlement.units_total),
        num_cell(settlement.amount_total),
    ));
    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use misweb_client::SolarRow;

    fn solar(account: &str, date: &str, units: f64, amount: f64) -> SolarRow {
        SolarRow {
            account_no: account.to_string(),
            consumer_name: "W.A. Perera".to_string(),
            settle_date: date.to_string(),
            units,
            amount,
        }
    }

    #[test]
    fn test_table_groups_by_month() {
        let rows = vec![
            solar("0012345601", "2026-02-28", 100.0, 3000.0),
            solar("0012345602", "2026-03-05", 120.0, 3600.0),
        ];
        let settlement = SolarSettlement::build(&rows);
        let html = render_solar_table(&settlement);

        assert!(html.contains(">2026-02</td>"));
        assert!(html.contains("Total 2026-03"));
        assert!(html.contains("6,600.00"));
    }

    #[test]
    fn test_date_range_validation_blocks_fetch() {
        let params: HashMap<String, String> = [("from", "2026-03-01"), ("to", "2026-01-01")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(DateRangeFilter::from_params(&params).is_err());
    }
}
