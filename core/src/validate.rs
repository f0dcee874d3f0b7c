//! Input validation for every client operation.
//!
//! # Design
//! Validation runs before a request is built, so a contract violation never
//! costs a network round-trip. Every failure is `ApiError::InvalidInput`
//! carrying the offending field name. Checks the wire contract states in
//! dynamic terms ("not a string", NaN, null filter values, unknown
//! operators) are unrepresentable in the Rust types and have no runtime
//! counterpart here; what remains is blankness, emptiness, ranges, and
//! mutual exclusion.

use crate::error::ApiError;
use crate::types::{FilterCondition, IndexRequest, ListRequest, SearchRequest, UpdateRequest};

/// Paging bounds for `list`; the service caps page size at 100.
pub const LIST_MAX_LIMIT: usize = 100;

/// Fail unless `value` contains at least one non-whitespace character.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid_input(
            field,
            "must be a non-empty string",
        ));
    }
    Ok(())
}

/// `collections` must be non-empty and contain no blank names.
pub fn require_collections(collections: &[String]) -> Result<(), ApiError> {
    if collections.is_empty() {
        return Err(ApiError::invalid_input(
            "collections",
            "must be a non-empty array of collection names",
        ));
    }
    if collections.iter().any(|c| c.trim().is_empty()) {
        return Err(ApiError::invalid_input(
            "collections",
            "collection names must be non-empty strings",
        ));
    }
    Ok(())
}

/// `filters`, when supplied, must be non-empty with non-blank keys.
pub fn require_filters(filters: &[FilterCondition]) -> Result<(), ApiError> {
    if filters.is_empty() {
        return Err(ApiError::invalid_input(
            "filters",
            "must be a non-empty array of filter conditions",
        ));
    }
    for condition in filters {
        if condition.key.trim().is_empty() {
            return Err(ApiError::invalid_input(
                "filters",
                "filter keys must be non-empty strings",
            ));
        }
    }
    Ok(())
}

pub fn validate_index(input: &IndexRequest) -> Result<(), ApiError> {
    require_non_blank("id", &input.id)?;
    require_non_blank("collection", &input.collection)?;
    require_non_blank("title", &input.title)?;
    require_non_blank("content", &input.content)
}

pub fn validate_search(input: &SearchRequest) -> Result<(), ApiError> {
    require_non_blank("query", &input.query)?;
    require_collections(&input.collections)?;
    if let Some(limit) = input.limit {
        if limit == 0 {
            return Err(ApiError::invalid_input("limit", "must be at least 1"));
        }
    }
    // Mutual exclusion is on presence, not truthiness: `auto_filters:
    // Some(false)` alongside `filters` is still a contract violation.
    if input.filters.is_some() && input.auto_filters.is_some() {
        return Err(ApiError::invalid_input(
            "filters",
            "filters and autoFilters are mutually exclusive",
        ));
    }
    if let Some(filters) = &input.filters {
        require_filters(filters)?;
    }
    Ok(())
}

pub fn validate_update(input: &UpdateRequest) -> Result<(), ApiError> {
    require_non_blank("id", &input.id)?;
    if input.title.is_none() && input.metadata.is_none() {
        return Err(ApiError::invalid_input(
            "metadata",
            "update requires at least one of title or metadata",
        ));
    }
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }
    Ok(())
}

pub fn validate_list(input: &ListRequest) -> Result<(), ApiError> {
    if let Some(limit) = input.limit {
        if limit == 0 || limit > LIST_MAX_LIMIT {
            return Err(ApiError::invalid_input(
                "limit",
                format!("must be between 1 and {LIST_MAX_LIMIT}"),
            ));
        }
    }
    Ok(())
}

/// Validate the API key supplied at client construction.
pub fn validate_api_key(api_key: &str) -> Result<(), ApiError> {
    require_non_blank("apiKey", api_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FilterOperator, FilterValue};

    fn filter(key: &str) -> FilterCondition {
        FilterCondition {
            key: key.to_string(),
            operator: FilterOperator::Eq,
            value: FilterValue::Str("kitchen".to_string()),
        }
    }

    fn search_input() -> SearchRequest {
        SearchRequest {
            query: "table lamp".to_string(),
            collections: vec!["products".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn blank_strings_fail() {
        assert!(require_non_blank("id", "").is_err());
        assert!(require_non_blank("id", "   ").is_err());
        assert!(require_non_blank("id", "doc-1").is_ok());
    }

    #[test]
    fn search_rejects_blank_query() {
        let mut input = search_input();
        input.query = "  ".to_string();
        let err = validate_search(&input).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn search_rejects_empty_collections() {
        let mut input = search_input();
        input.collections = vec![];
        assert!(validate_search(&input).is_err());

        input.collections = vec!["".to_string(), "  ".to_string()];
        assert!(validate_search(&input).is_err());
    }

    #[test]
    fn search_limit_bounds() {
        let mut input = search_input();
        input.limit = Some(0);
        assert!(validate_search(&input).is_err());

        input.limit = Some(1);
        assert!(validate_search(&input).is_ok());
    }

    #[test]
    fn search_rejects_filters_with_auto_filters() {
        let mut input = search_input();
        input.filters = Some(vec![filter("category")]);
        input.auto_filters = Some(true);
        assert!(validate_search(&input).is_err());

        // Still rejected when autoFilters is explicitly false.
        input.auto_filters = Some(false);
        assert!(validate_search(&input).is_err());

        input.auto_filters = None;
        assert!(validate_search(&input).is_ok());
    }

    #[test]
    fn search_rejects_empty_filter_array() {
        let mut input = search_input();
        input.filters = Some(vec![]);
        assert!(validate_search(&input).is_err());
    }

    #[test]
    fn search_rejects_blank_filter_key() {
        let mut input = search_input();
        input.filters = Some(vec![filter(" ")]);
        assert!(validate_search(&input).is_err());
    }

    #[test]
    fn index_requires_all_strings() {
        let input = IndexRequest {
            id: "a".to_string(),
            collection: "c".to_string(),
            title: "t".to_string(),
            content: "".to_string(),
            metadata: None,
        };
        assert!(validate_index(&input).is_err());
    }

    #[test]
    fn update_requires_a_change() {
        let input = UpdateRequest {
            id: "a".to_string(),
            ..Default::default()
        };
        assert!(validate_update(&input).is_err());

        let input = UpdateRequest {
            id: "a".to_string(),
            title: Some("new title".to_string()),
            ..Default::default()
        };
        assert!(validate_update(&input).is_ok());
    }

    #[test]
    fn list_limit_bounds() {
        for (limit, ok) in [(0, false), (1, true), (100, true), (101, false)] {
            let input = ListRequest {
                limit: Some(limit),
                offset: None,
            };
            assert_eq!(validate_list(&input).is_ok(), ok, "limit {limit}");
        }
    }

    #[test]
    fn api_key_must_be_non_blank() {
        assert!(validate_api_key("").is_err());
        assert!(validate_api_key(" \t").is_err());
        assert!(validate_api_key("sk-etoile").is_ok());
    }
}
