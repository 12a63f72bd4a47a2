//! HTTP server with HTMX report pages and export endpoints
//!
//! Routes are organized into modules:
//! - routes::entities: Entity browser (search, pagination, view actions)
//! - routes::reports::ledger_card: Ledger card with running balances
//! - routes::reports::income_expenditure: Income & expenditure pivot
//! - routes::reports::piv: PIV register by department
//! - routes::reports::verification: Annual physical verification sheet
//! - routes::reports::solar: Solar payment settlements
//!
//! Every report module serves a filter page, an HTMX table partial, a CSV
//! download, and a print-ready document.

pub mod error;
pub mod routes;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use misweb_client::SourceRef;
use misweb_config::Config;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub source: SourceRef,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::entities::{api_entities, htmx_entities_list, page_entities};
    use routes::reports::income_expenditure::{
        csv_income_expenditure, page_income_expenditure, print_income_expenditure,
        view_income_expenditure,
    };
    use routes::reports::ledger_card::{
        csv_ledger_card, page_ledger_card, print_ledger_card, view_ledger_card,
    };
    use routes::reports::piv::{csv_piv_register, page_piv_register, print_piv_register, view_piv_register};
    use routes::reports::solar::{csv_solar, page_solar, print_solar, view_solar};
    use routes::reports::verification::{
        csv_verification, page_verification, print_verification, view_verification,
    };

    Router::new()
        // JSON API endpoints
        .route("/api/health", get(health_check))
        .route("/api/entities", get(api_entities))
        // Pages
        .route("/", get(index_page))
        .route("/entities", get(page_entities))
        .route("/entities/list", get(htmx_entities_list))
        // Ledger card
        .route("/reports/ledger-card", get(page_ledger_card))
        .route("/reports/ledger-card/view", get(view_ledger_card))
        .route("/reports/ledger-card/export.csv", get(csv_ledger_card))
        .route("/reports/ledger-card/print", get(print_ledger_card))
        // Income & expenditure
        .route("/reports/income-expenditure", get(page_income_expenditure))
        .route("/reports/income-expenditure/view", get(view_income_expenditure))
        .route("/reports/income-expenditure/export.csv", get(csv_income_expenditure))
        .route("/reports/income-expenditure/print", get(print_income_expenditure))
        // PIV register
        .route("/reports/piv-register", get(page_piv_register))
        .route("/reports/piv-register/view", get(view_piv_register))
        .route("/reports/piv-register/export.csv", get(csv_piv_register))
        .route("/reports/piv-register/print", get(print_piv_register))
        // Physical verification
        .route("/reports/verification", get(page_verification))
        .route("/reports/verification/view", get(view_verification))
        .route("/reports/verification/export.csv", get(csv_verification))
        .route("/reports/verification/print", get(print_verification))
        // Solar settlements
        .route("/reports/solar", get(page_solar))
        .route("/reports/solar/view", get(view_solar))
        .route("/reports/solar/export.csv", get(csv_solar))
        .route("/reports/solar/print", get(print_solar))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Misweb</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
        table.report {{ border-collapse: collapse; width: 100%; font-size: 0.85rem; }}
        table.report th, table.report td {{ border: 1px solid #d1d5db; padding: 4px 8px; }}
        table.report th {{ background: #f3f4f6; text-align: center; }}
        table.report td.num {{ text-align: right; white-space: nowrap; font-variant-numeric: tabular-nums; }}
        table.report tr.subtotal td {{ font-weight: 600; background: #f9fafb; }}
        table.report tr.grand-total td {{ font-weight: 700; background: #eef2ff; }}
        table.report td.group-head {{ font-weight: 600; vertical-align: top; background: #fafafa; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Dashboard", "dashboard"),
        ("/entities", "Entities", "entities"),
        ("/reports/ledger-card", "Ledger Card", "ledger"),
        ("/reports/income-expenditure", "Income & Expenditure", "income"),
        ("/reports/piv-register", "PIV Register", "piv"),
        ("/reports/verification", "Physical Verification", "verification"),
        ("/reports/solar", "Solar Settlements", "solar"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Misweb</h1><p class='text-xs text-gray-400'>MIS Reporting Portal</p></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, id) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        let icon = match *id {
            "dashboard" => "📊",
            "entities" => "🏢",
            "ledger" => "📒",
            "income" => "📈",
            "piv" => "🧾",
            "verification" => "📦",
            "solar" => "☀️",
            _ => "📄",
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Check if request is from HTMX (partial page update)
pub(crate) fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Index page with the report catalog
async fn index_page(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let reports = [
        ("/reports/ledger-card", "Ledger Card", "Sub-account transactions with running balances over a month range."),
        ("/reports/income-expenditure", "Income & Expenditure", "Account by cost-centre pivot with surplus/deficit."),
        ("/reports/piv-register", "PIV Register", "Payment instruction vouchers by department over a date range."),
        ("/reports/verification", "Physical Verification", "Annual stock-count reconciliation by stock book."),
        ("/reports/solar", "Solar Settlements", "Solar payment settlements grouped by month."),
    ];

    let cards: Vec<String> = reports
        .iter()
        .map(|(path, title, blurb)| {
            format!(
                r#"<a href='{}' class='block bg-white rounded-xl shadow-sm p-6 hover:shadow-md'>
                <h3 class='text-lg font-semibold mb-1'>{}</h3>
                <p class='text-sm text-gray-500'>{}</p>
            </a>"#,
                path, title, blurb
            )
        })
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2>
        <p class='text-gray-500'>Upstream backend: {}</p></div>
        <div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4'>{}</div>"#,
        misweb_export::escape_html(&state.config.upstream.base_url),
        cards.join("")
    );

    axum::response::Html(page_response(&headers, "Dashboard", "/", &inner_content))
}

/// Start the HTTP server
///
/// Creates the router, binds to the configured address, and serves until
/// the process exits.
pub async fn start_server(config: Config, source: SourceRef) {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { source, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await.unwrap();
    eprintln!("[INFO] Starting Misweb server on http://{}", addr);
    eprintln!("[INFO] Available routes:");
    eprintln!("[INFO]   - / (Dashboard)");
    eprintln!("[INFO]   - /entities (Entity browser)");
    eprintln!("[INFO]   - /reports/ledger-card (Ledger card)");
    eprintln!("[INFO]   - /reports/income-expenditure (Income & expenditure)");
    eprintln!("[INFO]   - /reports/piv-register (PIV register)");
    eprintln!("[INFO]   - /reports/verification (Physical verification)");
    eprintln!("[INFO]   - /reports/solar (Solar settlements)");
    eprintln!("[INFO]   - /api/* (JSON API endpoints)");

    match axum::serve(listener, router).await {
        Ok(_) => eprintln!("[INFO] Server stopped gracefully"),
        Err(e) => eprintln!("[ERROR] Server error: {}", e),
    }
}
