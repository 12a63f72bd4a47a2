//! Entity list filtering and pagination
//!
//! Search is a case-insensitive substring match over id and name, applied
//! after the full list is fetched. Changing either search term puts the
//! pager back on page 1 (the API layer simply omits the page parameter when
//! a search changes).

use serde::Serialize;

use misweb_client::Entity;

/// Filter entities by id and name substrings, preserving list order
pub fn filter_entities<'a>(
    entities: &'a [Entity],
    search_id: &str,
    search_name: &str,
) -> Vec<&'a Entity> {
    let search_id = search_id.trim().to_lowercase();
    let search_name = search_name.trim().to_lowercase();

    entities
        .iter()
        .filter(|e| {
            (search_id.is_empty() || e.id.to_lowercase().contains(&search_id))
                && (search_name.is_empty() || e.name.to_lowercase().contains(&search_name))
        })
        .collect()
}

/// A resolved pager window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Page {
    /// 1-based current page; 1 even when there are no items
    pub page: usize,
    /// ceil(total / page_size); 0 when there are no items
    pub page_count: usize,
    pub total: usize,
    /// Start index into the filtered list, inclusive
    pub start: usize,
    /// End index, exclusive
    pub end: usize,
}

/// Clamp a requested 1-based page against the filtered total
pub fn paginate(total: usize, page_size: usize, requested_page: usize) -> Page {
    let page_count = total.div_ceil(page_size.max(1));
    let page = requested_page.clamp(1, page_count.max(1));
    let start = (page - 1) * page_size.max(1);
    let end = (start + page_size.max(1)).min(total);
    Page {
        page,
        page_count,
        total,
        start: start.min(total),
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, name: &str) -> Entity {
        Entity {
            id: id.to_string(),
            name: name.to_string(),
            region: None,
        }
    }

    fn sample() -> Vec<Entity> {
        vec![
            entity("C001", "Head Office"),
            entity("C002", "Area North"),
            entity("C010", "Area South"),
            entity("D001", "Stores Department"),
        ]
    }

    #[test]
    fn test_filter_by_id_case_insensitive() {
        let entities = sample();
        let hits = filter_entities(&entities, "c0", "");
        assert_eq!(hits.len(), 3);

        let hits = filter_entities(&entities, "C01", "");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "C010");
    }

    #[test]
    fn test_filter_by_name_substring() {
        let entities = sample();
        let hits = filter_entities(&entities, "", "area");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_filter_both_fields_conjoined() {
        let entities = sample();
        let hits = filter_entities(&entities, "C0", "south");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Area South");
    }

    #[test]
    fn test_blank_search_matches_all() {
        let entities = sample();
        assert_eq!(filter_entities(&entities, "", "  ").len(), 4);
    }

    #[test]
    fn test_page_count_ceiling() {
        // N items at page size P show ceil(N/P) pages
        assert_eq!(paginate(100, 50, 1).page_count, 2);
        assert_eq!(paginate(101, 50, 1).page_count, 3);
        assert_eq!(paginate(50, 50, 1).page_count, 1);
        assert_eq!(paginate(0, 50, 1).page_count, 0);
    }

    #[test]
    fn test_page_window() {
        let page = paginate(101, 50, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.start, 100);
        assert_eq!(page.end, 101);
    }

    #[test]
    fn test_page_clamped_after_filtering() {
        // A narrower filter result pulls an out-of-range page back in range
        let page = paginate(20, 50, 4);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.start, 0);
        assert_eq!(page.end, 20);
    }

    #[test]
    fn test_empty_list_page() {
        let page = paginate(0, 50, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.start, 0);
        assert_eq!(page.end, 0);
    }
}
