//! Domain DTOs for the Étoile search API.
//!
//! # Design
//! These types mirror the server's wire schema but are defined
//! independently; the mock-server crate re-declares its own and integration
//! tests catch schema drift. Multi-word request/response keys are camelCase
//! on the wire (`autoFilters`, `appliedFilters`, `refinedQuery`) while
//! document records use snake_case (`external_id`, `created_at`), matching
//! the service. Optional request fields carry `skip_serializing_if` because
//! their *absence* is observable to the server — an omitted `filters` key
//! and an empty one mean different things.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Arbitrary string-keyed document metadata.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Configuration for constructing an [`crate::EtoileClient`].
///
/// `api_key` must be non-blank. `base_url` defaults to the public API root
/// when `None`; trailing slashes are stripped at construction.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Comparison operator of a metadata filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Contains,
}

/// Value side of a metadata filter.
///
/// Untagged: serializes as a bare string, number, bool, or string array.
/// A null value is unrepresentable by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Str(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

/// A structured condition narrowing search results by document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub key: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

/// Request payload for indexing a document.
#[derive(Debug, Clone, Serialize)]
pub struct IndexRequest {
    pub id: String,
    pub collection: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Request payload for a search.
///
/// `limit` and `offset` default to 10 and 0 at request-shaping time.
/// `filters` and `auto_filters` are mutually exclusive; supplying both is
/// rejected before any request is built.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub collections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterCondition>>,
    #[serde(rename = "autoFilters", skip_serializing_if = "Option::is_none")]
    pub auto_filters: Option<bool>,
}

/// Request payload for a partial document update. Only the fields present
/// in the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Paging parameters for listing documents. `limit` is capped at 100 by
/// the service; defaults are 20 and 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListRequest {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Server-of-record representation of an indexed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub external_id: String,
    pub collection: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single search hit. `score` is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub external_id: String,
    pub title: String,
    pub collection: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Response envelope for `search`.
///
/// `applied_filters` and `refined_query` are present only when the request
/// carried `filters` or `autoFilters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    #[serde(rename = "appliedFilters", skip_serializing_if = "Option::is_none")]
    pub applied_filters: Option<Vec<FilterCondition>>,
    #[serde(rename = "refinedQuery", skip_serializing_if = "Option::is_none")]
    pub refined_query: Option<String>,
}

/// Response envelope for `index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub document: Document,
}

/// Response envelope for `update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub document: Document,
}

/// Response envelope for `get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub document: Document,
}

/// Acknowledgment for `delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Response envelope for `list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub documents: Vec<Document>,
    pub total: usize,
}
