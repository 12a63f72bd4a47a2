//! Entities JSON API

use axum::extract::Query;
use axum::Json;
use std::collections::HashMap;

use misweb_client::{Entity, EntityKind};
use misweb_core::filter_entities;

use crate::error::ApiError;
use crate::AppState;

/// Entity list response for API
#[derive(Debug, serde::Serialize)]
pub struct EntitiesResponse {
    pub entities: Vec<Entity>,
    pub total_count: usize,
}

/// List entities of a kind, optionally filtered by id/name substrings
pub async fn api_entities(
    state: axum::extract::State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Result<Json<EntitiesResponse>, ApiError> {
    let kind = parse_kind(&query)?;

    let entities = state.source.entities(kind).await?;

    let search_id = query.get("search_id").map(|s| s.as_str()).unwrap_or("");
    let search_name = query.get("search_name").map(|s| s.as_str()).unwrap_or("");
    let filtered: Vec<Entity> = filter_entities(&entities, search_id, search_name)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(EntitiesResponse {
        total_count: filtered.len(),
        entities: filtered,
    }))
}

pub(crate) fn parse_kind(params: &HashMap<String, String>) -> Result<EntityKind, ApiError> {
    match params.get("kind") {
        Some(value) => value
            .parse()
            .map_err(|message| ApiError::BadRequest { message }),
        None => Ok(EntityKind::Companies),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_defaults_to_companies() {
        let params = HashMap::new();
        assert_eq!(parse_kind(&params).unwrap(), EntityKind::Companies);
    }

    #[test]
    fn test_parse_kind_rejects_unknown() {
        let mut params = HashMap::new();
        params.insert("kind".to_string(), "warehouses".to_string());
        assert!(parse_kind(&params).is_err());
    }
}
