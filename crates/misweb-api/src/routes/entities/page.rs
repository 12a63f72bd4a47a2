//! Entity browser page rendering
//!
//! The page shell holds the kind tabs and search inputs; the table itself
//! loads as an HTMX partial. Search inputs re-request the partial without a
//! page parameter, which puts the pager back on page 1.

use axum::extract::Query;
use std::collections::HashMap;

use misweb_client::{Entity, EntityKind};
use misweb_core::{filter_entities, paginate};
use misweb_export::escape_html;

use super::api::parse_kind;
use crate::routes::{error_banner, query_string};
use crate::AppState;

/// Entity browser page
pub async fn page_entities(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    query: Query<HashMap<String, String>>,
) -> axum::response::Html<String> {
    let kind = parse_kind(&query).unwrap_or(EntityKind::Companies);
    let page_size = state.config.pagination.records_per_page;

    let tabs: String = [EntityKind::Companies, EntityKind::CostCentres, EntityKind::Departments]
        .iter()
        .map(|k| {
            let active = if *k == kind {
                "bg-indigo-600 text-white"
            } else {
                "border hover:bg-gray-50"
            };
            format!(
                r#"<a href='/entities?kind={}' class='px-4 py-2 rounded-lg {}'>{}</a>"#,
                k, active, k.label()
            )
        })
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Entities</h2>
        <p class='text-gray-500'>Browse and pick an entity, then open its reports.</p></div>
        <div class='flex gap-2 mb-4'>{tabs}</div>
        <div class='flex gap-2 mb-4'>
            <input type='hidden' name='kind' value='{kind}'>
            <input type='text' name='search_id' placeholder='Search by code...'
                hx-get='/entities/list' hx-target='#entities-content' hx-trigger='keyup changed delay:500ms'
                hx-include="[name='kind'],[name='search_name']"
                class='px-4 py-2 border rounded-lg w-48'>
            <input type='text' name='search_name' placeholder='Search by name...'
                hx-get='/entities/list' hx-target='#entities-content' hx-trigger='keyup changed delay:500ms'
                hx-include="[name='kind'],[name='search_id']"
                class='px-4 py-2 border rounded-lg w-64'>
            <span class='text-sm text-gray-400 self-center'>{page_size} per page</span>
        </div>
        <div id='entities-content' hx-get='/entities/list?kind={kind}' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        tabs = tabs,
        kind = kind,
        page_size = page_size,
    );

    axum::response::Html(crate::page_response(
        &headers,
        "Entities",
        "/entities",
        &inner_content,
    ))
}

/// Entity table partial with search and pagination applied
pub async fn htmx_entities_list(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> axum::response::Html<String> {
    let kind = match parse_kind(&query) {
        Ok(kind) => kind,
        Err(_) => return axum::response::Html(error_banner("Unknown entity kind.")),
    };

    let entities = match state.source.entities(kind).await {
        Ok(entities) => entities,
        // No retry; the list stays empty until the user searches again
        Err(e) => return axum::response::Html(error_banner(&e.user_message())),
    };

    let search_id = query.get("search_id").map(|s| s.as_str()).unwrap_or("");
    let search_name = query.get("search_name").map(|s| s.as_str()).unwrap_or("");
    let requested_page = query
        .get("page")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    let filtered = filter_entities(&entities, search_id, search_name);
    let page = paginate(filtered.len(), state.config.pagination.records_per_page, requested_page);
    let visible = &filtered[page.start..page.end];
    log::debug!(
        "entities list: kind={}, {} of {} match, page {}/{}",
        kind,
        page.total,
        entities.len(),
        page.page,
        page.page_count
    );

    axum::response::Html(render_entities_table(kind, visible, &page, search_id, search_name))
}

fn render_entities_table(
    kind: EntityKind,
    entities: &[&Entity],
    page: &misweb_core::Page,
    search_id: &str,
    search_name: &str,
) -> String {
    if entities.is_empty() {
        return r#"<div class='text-center py-12 text-gray-500'><p>No matching entities</p></div>"#
            .to_string();
    }

    let mut html = String::from(
        r#"<table class='report'><thead><tr><th>Code</th><th>Name</th><th>Region</th><th></th></tr></thead><tbody>"#,
    );

    for entity in entities {
        html.push_str(&format!(
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class='text-center'>{}</td></tr>"#,
            escape_html(&entity.id),
            escape_html(&entity.name),
            escape_html(entity.region.as_deref().unwrap_or("-")),
            view_action(kind, entity),
        ));
    }
    html.push_str("</tbody></table>");

    // Pager keeps the search terms; a changed search omits the page
    // parameter and lands back on page 1
    let base_query = query_string(&[
        ("kind", &kind.to_string()),
        ("search_id", search_id),
        ("search_name", search_name),
    ]);
    let prev = if page.page > 1 {
        format!(
            r#"<button hx-get='/entities/list?{}&page={}' hx-target='#entities-content' class='px-3 py-1.5 border rounded-lg hover:bg-gray-50'>Previous</button>"#,
            base_query,
            page.page - 1
        )
    } else {
        String::new()
    };
    let next = if page.page < page.page_count {
        format!(
            r#"<button hx-get='/entities/list?{}&page={}' hx-target='#entities-content' class='px-3 py-1.5 border rounded-lg hover:bg-gray-50'>Next</button>"#,
            base_query,
            page.page + 1
        )
    } else {
        String::new()
    };

    html.push_str(&format!(
        r#"<div class='flex items-center justify-between mt-4'>
        <span class='text-sm text-gray-500'>Page {} of {} ({} records)</span>
        <div class='flex gap-2'>{}{}</div>
    </div>"#,
        page.page, page.page_count, page.total, prev, next
    ));

    html
}

/// Per-row action linking into the report that consumes this entity kind
fn view_action(kind: EntityKind, entity: &Entity) -> String {
    let (path, label, id_param, name_param) = match kind {
        EntityKind::Companies => ("/reports/ledger-card", "Ledger card", "company", "company_name"),
        EntityKind::CostCentres => ("/reports/income-expenditure", "Income & expenditure", "cost_centre", "cost_centre_name"),
        EntityKind::Departments => ("/reports/piv-register", "PIV register", "dept", "dept_name"),
    };
    format!(
        r#"<a href='{}?{}' class='text-indigo-600 hover:text-indigo-800 text-sm font-medium'>{}</a>"#,
        path,
        query_string(&[(id_param, &entity.id), (name_param, &entity.name)]),
        label
    )
}
