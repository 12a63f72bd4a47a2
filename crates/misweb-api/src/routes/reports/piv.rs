//! PIV register report
//!
//! Payment instruction vouchers for a department over a date range,
//! grouped by department with count and amount subtotals.

use axum::extract::Query;
use axum::response::{Html, Response};
use std::collections::HashMap;

use misweb_core::filters::required;
use misweb_core::{DateRangeFilter, PivRegister};
use misweb_export::{escape_html, quote_code, CsvDocument, PageLayout, PrintDocument};

use crate::error::ApiError;
use crate::routes::{
    csv_response, empty_state, error_banner, num_cell, print_response, query_string,
    report_actions, text_cell,
};
use crate::AppState;

/// PIV register filter page
pub async fn page_piv_register(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    query: Query<HashMap<String, String>>,
) -> Html<String> {
    let selected_dept = query.get("dept").map(|s| s.as_str()).unwrap_or("");

    let (dept_options, fetch_error) = match state
        .source
        .entities(misweb_client::EntityKind::Departments)
        .await
    {
        Ok(departments) => {
            let opts: String = departments
                .iter()
                .map(|d| {
                    let selected = if d.id == selected_dept { " selected" } else { "" };
                    format!(
                        r#"<option value='{}' data-name='{}'{}>{} - {}</option>"#,
                        escape_html(&d.id),
                        escape_html(&d.name),
                        selected,
                        escape_html(&d.id),
                        escape_html(&d.name)
                    )
                })
                .collect();
            (opts, String::new())
        }
        Err(e) => (String::new(), error_banner(&e.user_message())),
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>PIV Register</h2>
        <p class='text-gray-500'>Payment instruction vouchers by department.</p></div>
        {fetch_error}
        <form id='piv-filter' class='bg-white rounded-xl shadow-sm p-4 mb-4 flex flex-wrap gap-3 items-end'>
            <label class='block text-sm'>Department
                <select name='dept' class='block mt-1 px-3 py-2 border rounded-lg min-w-[220px]'
                    onchange="this.form.dept_name.value = this.selectedOptions[0] ? (this.selectedOptions[0].dataset.name || '') : ''">
                    <option value=''>Select a department</option>
                    {dept_options}
                </select>
            </label>
            <input type='hidden' name='dept_name' value=''>
            <label class='block text-sm'>From
                <input type='date' name='from' class='block mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <label class='block text-sm'>To
                <input type='date' name='to' class='block mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <button hx-get='/reports/piv-register/view' hx-target='#report-content' hx-include='#piv-filter'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>View</button>
        </form>
        <div id='report-content' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Select filters and press View.</p>
        </div>"#,
        fetch_error = fetch_error,
        dept_options = dept_options,
    );

    Html(crate::page_response(&headers, "PIV Register", "/reports/piv-register", &inner_content))
}

/// PIV register table partial
pub async fn view_piv_register(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Html<String> {
    let (dept, range) = match parse_filters(&query) {
        Ok(parsed) => parsed,
        Err(e) => return Html(error_banner(&e.message())),
    };

    let rows = match state.source.piv_register(&dept, range.from, range.to).await {
        Ok(rows) => rows,
        Err(e) => return Html(error_banner(&e.user_message())),
    };

    if rows.is_empty() {
        return Html(empty_state("No vouchers for the selected department and dates."));
    }

    let register = PivRegister::build(&rows);
    let export_query = query_string(&[
        ("dept", &dept),
        ("from", &range.from.to_string()),
        ("to", &range.to.to_string()),
    ]);

    let mut html = report_actions("/reports/piv-register", &export_query);
    html.push_str(&render_piv_table(&register));
    Html(html)
}

/// CSV download
pub async fn csv_piv_register(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let (dept, range) = parse_filters(&query)?;
    let rows = state.source.piv_register(&dept, range.from, range.to).await?;
    let register = PivRegister::build(&rows);

    let mut doc = CsvDocument::new();
    doc.title("PIV Register");
    doc.title(&format!("Period: {}", range.label()));
    doc.blank();
    doc.header(&["Department", "PIV No", "Date", "Payee", "Amount"]);

    for group in &register.departments {
        for voucher in &group.vouchers {
            doc.row(&[
                misweb_export::escape_field(&group.dept_name),
                quote_code(&voucher.piv_no),
                misweb_export::escape_field(&voucher.piv_date),
                misweb_export::escape_field(&voucher.payee),
                format!("{:.2}", voucher.amount),
            ]);
        }
        doc.row(&[
            misweb_export::escape_field(&format!("Total {} ({} vouchers)", group.dept_name, group.count)),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", group.amount_total),
        ]);
    }
    if !register.is_empty() {
        doc.row(&[
            format!("Grand Total ({} vouchers)", register.count),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", register.amount_total),
        ]);
    }

    Ok(csv_response(&format!("piv-register-{}.csv", dept), doc))
}

/// Print document
pub async fn print_piv_register(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let (dept, range) = parse_filters(&query)?;
    let rows = state.source.piv_register(&dept, range.from, range.to).await?;

    if rows.is_empty() {
        return Ok(print_response(None));
    }

    let register = PivRegister::build(&rows);
    let mut doc = PrintDocument::new("PIV Register", PageLayout::A4Landscape)
        .sub_heading(format!("Period: {}", range.label()))
        .table(render_piv_table(&register))
        .signature("Prepared by")
        .signature("Authorized by");
    if let Some(name) = query.get("dept_name").filter(|s| !s.is_empty()) {
        doc = doc.sub_heading(name.clone());
    }

    Ok(print_response(Some(doc)))
}

// ==================== Helpers ====================

fn parse_filters(params: &HashMap<String, String>) -> Result<(String, DateRangeFilter), ApiError> {
    let dept = required(params, "dept")?.to_string();
    let range = DateRangeFilter::from_params(params)?;
    Ok((dept, range))
}

fn render_piv_table(register: &PivRegister) -> String {
    let mut html = String::from(
        r#"<table class='report'><thead><tr><th>PIV No</th><th>Date</th><th>Payee</th><th>Amount</th></tr></thead><tbody>"#,
    );

    for group in &register.departments {
        html.push_str(&format!(
            r#"<tr><td class='group-head' colspan='4'>{} - {}</td></tr>"#,
            escape_html(&group.dept_id),
            escape_html(&group.dept_name),
        ));
        for voucher in &group.vouchers {
            html.push_str("<tr>");
            html.push_str(&text_cell(&voucher.piv_no));
            html.push_str(&text_cell(&voucher.piv_date));
            html.push_str(&text_cell(&voucher.payee));
            html.push_str(&num_cell(voucher.amount));
            html.push_str("</tr>");
        }
        html.push_str(&format!(
            r#"<tr class='subtotal'><td colspan='3'>Total {} ({} vouchers)</td>{}</tr>"#,
            escape_html(&group.dept_name),
            group.count,
            num_cell(group.amount_total),
        ));
    }

    html.push_str(&format!(
        r#"<tr class='grand-total'><td colspan='3'>Grand Total ({} vouchers)</td>{}</tr>"#,
        register.count,
        num_cell(register.amount_total),
    ));
    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use misweb_client::PivRow;

    fn piv(no: &str, dept: &str, amount: f64) -> PivRow {
        PivRow {
            piv_no: no.to_string(),
            piv_date: "2026-02-10".to_string(),
            dept_id: dept.to_string(),
            dept_name: format!("Dept {}", dept),
            payee: "Lanka Transformers, Ltd".to_string(),
            amount,
        }
    }

    #[test]
    fn test_table_subtotals() {
        let rows = vec![piv("P1", "D1", 10.0), piv("P2", "D1", 20.0), piv("P3", "D2", 5.0)];
        let register = PivRegister::build(&rows);
        let html = render_piv_table(&register);

        assert!(html.contains("Total Dept D1 (2 vouchers)"));
        assert!(html.contains("Grand Total (3 vouchers)"));
        assert!(html.contains("35.00"));
    }

    #[test]
    fn test_parse_filters_requires_dept() {
        let params: HashMap<String, String> = [("from", "2026-01-01"), ("to", "2026-01-31")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(parse_filters(&params).is_err());
    }

    #[test]
    fn test_csv_payee_with_comma_round_trips() {
        let rows = vec![piv("P1", "D1", 10.0)];
        let register = PivRegister::build(&rows);

        let mut doc = CsvDocument::new();
        for group in &register.departments {
            for voucher in &group.vouchers {
                doc.row(&[misweb_export::escape_field(&voucher.payee)]);
            }
        }
        let text = String::from_utf8(doc.into_bytes().unwrap()).unwrap();
        assert!(text.contains("\"Lanka Transformers, Ltd\""));
    }
}
