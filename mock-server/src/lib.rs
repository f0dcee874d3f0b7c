//! In-repo implementation of the Étoile search API surface.
//!
//! Backs the core crate's integration tests and runs standalone via the
//! `mock-server` binary. Documents live in an in-memory map keyed by
//! external id; "relevance" is the fraction of query terms found in a
//! document's title or content, which keeps scores deterministic and inside
//! `[0, 1]`. Every route requires the configured bearer token.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub external_id: String,
    pub collection: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
struct StoredDoc {
    document: Document,
    content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Filter {
    pub key: String,
    pub operator: String,
    pub value: Value,
}

#[derive(Deserialize)]
pub struct IndexBody {
    pub id: String,
    pub collection: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, Value>>,
}

fn default_limit() -> usize {
    10
}

#[derive(Deserialize)]
pub struct SearchBody {
    pub query: String,
    pub collections: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub filters: Option<Vec<Filter>>,
    #[serde(default, rename = "autoFilters")]
    pub auto_filters: Option<bool>,
}

#[derive(Deserialize)]
pub struct DeleteBody {
    pub id: String,
}

#[derive(Deserialize)]
pub struct PatchBody {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, Value>>,
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_list_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_list_limit() -> usize {
    20
}

#[derive(Default)]
struct Store {
    next_id: u64,
    docs: HashMap<String, StoredDoc>,
}

pub struct AppState {
    api_key: String,
    store: RwLock<Store>,
}

type Shared = Arc<AppState>;
type ErrorResponse = (StatusCode, Json<Value>);

pub fn app(api_key: &str) -> Router {
    let state = Arc::new(AppState {
        api_key: api_key.to_string(),
        store: RwLock::new(Store::default()),
    });
    Router::new()
        .route("/index", post(index_doc))
        .route("/search", post(search))
        .route(
            "/documents",
            get(list_docs).delete(delete_doc).patch(patch_doc),
        )
        .route("/documents/{id}", get(get_doc))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn error_body(status: StatusCode, message: &str) -> ErrorResponse {
    (status, Json(json!({ "error": message })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ErrorResponse> {
    let expected = format!("Bearer {}", state.api_key);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(error_body(StatusCode::UNAUTHORIZED, "invalid API key")),
    }
}

async fn index_doc(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<IndexBody>,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    authorize(&state, &headers)?;
    let now = Utc::now();
    let mut store = state.store.write().await;

    let (status, document) = match store.docs.get(&input.id) {
        Some(existing) => {
            let mut document = existing.document.clone();
            document.collection = input.collection;
            document.title = input.title;
            document.metadata = input.metadata.unwrap_or_default();
            document.updated_at = now;
            (StatusCode::OK, document)
        }
        None => {
            store.next_id += 1;
            let document = Document {
                id: store.next_id,
                external_id: input.id.clone(),
                collection: input.collection,
                title: input.title,
                doc_type: "text".to_string(),
                metadata: input.metadata.unwrap_or_default(),
                created_at: now,
                updated_at: now,
            };
            (StatusCode::CREATED, document)
        }
    };

    debug!(external_id = %document.external_id, "indexed document");
    store.docs.insert(
        input.id,
        StoredDoc {
            document: document.clone(),
            content: input.content,
        },
    );
    Ok((status, Json(json!({ "document": document }))))
}

/// Pull `key:value` tokens out of a query as equality filters; the rest of
/// the tokens form the refined query.
fn extract_auto_filters(query: &str) -> (Vec<Filter>, String) {
    let mut filters = Vec::new();
    let mut remaining = Vec::new();
    for token in query.split_whitespace() {
        if let Some((key, value)) = token.split_once(':') {
            if !key.is_empty() && !value.is_empty() {
                filters.push(Filter {
                    key: key.to_string(),
                    operator: "eq".to_string(),
                    value: Value::String(value.to_string()),
                });
                continue;
            }
        }
        remaining.push(token);
    }
    (filters, remaining.join(" "))
}

fn compare_numbers(doc_value: &Value, filter_value: &Value) -> Option<std::cmp::Ordering> {
    let a = doc_value.as_f64()?;
    let b = filter_value.as_f64()?;
    a.partial_cmp(&b)
}

fn filter_matches(metadata: &serde_json::Map<String, Value>, filter: &Filter) -> bool {
    let Some(value) = metadata.get(&filter.key) else {
        return false;
    };
    use std::cmp::Ordering::*;
    match filter.operator.as_str() {
        "eq" => value == &filter.value,
        "neq" => value != &filter.value,
        "gt" => matches!(compare_numbers(value, &filter.value), Some(Greater)),
        "gte" => matches!(compare_numbers(value, &filter.value), Some(Greater | Equal)),
        "lt" => matches!(compare_numbers(value, &filter.value), Some(Less)),
        "lte" => matches!(compare_numbers(value, &filter.value), Some(Less | Equal)),
        "in" => filter
            .value
            .as_array()
            .is_some_and(|candidates| candidates.contains(value)),
        "contains" => match (value, &filter.value) {
            (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
            (Value::Array(items), needle) => items.contains(needle),
            _ => false,
        },
        _ => false,
    }
}

fn score(terms: &[String], stored: &StoredDoc) -> f64 {
    if terms.is_empty() {
        return 1.0;
    }
    let haystack = format!("{} {}", stored.document.title, stored.content).to_lowercase();
    let hits = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
    hits as f64 / terms.len() as f64
}

async fn search(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<SearchBody>,
) -> Result<Json<Value>, ErrorResponse> {
    authorize(&state, &headers)?;

    let auto = input.auto_filters == Some(true);
    let (extracted, refined_query) = if auto {
        let (filters, refined) = extract_auto_filters(&input.query);
        (Some(filters), Some(refined))
    } else {
        (None, None)
    };
    let applied = input.filters.clone().or(extracted);

    let effective_query = refined_query.as_deref().unwrap_or(&input.query);
    let terms: Vec<String> = effective_query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();

    let store = state.store.read().await;
    let mut hits: Vec<(f64, &StoredDoc)> = store
        .docs
        .values()
        .filter(|stored| input.collections.contains(&stored.document.collection))
        .filter(|stored| {
            applied
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .all(|f| filter_matches(&stored.document.metadata, f))
        })
        .map(|stored| (score(&terms, stored), stored))
        .filter(|(score, _)| *score > 0.0)
        .collect();

    hits.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.document.external_id.cmp(&b.1.document.external_id))
    });

    let results: Vec<Value> = hits
        .into_iter()
        .skip(input.offset)
        .take(input.limit)
        .map(|(score, stored)| {
            json!({
                "external_id": stored.document.external_id,
                "title": stored.document.title,
                "collection": stored.document.collection,
                "score": score,
                "metadata": stored.document.metadata,
            })
        })
        .collect();

    debug!(query = %input.query, hits = results.len(), "search");

    let mut response = json!({ "query": input.query, "results": results });
    if let Some(applied) = applied {
        response["appliedFilters"] = serde_json::to_value(applied).unwrap_or_default();
    }
    if let Some(refined) = refined_query {
        response["refinedQuery"] = Value::String(refined);
    }
    Ok(Json(response))
}

async fn delete_doc(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<DeleteBody>,
) -> Result<Json<Value>, ErrorResponse> {
    authorize(&state, &headers)?;
    let mut store = state.store.write().await;
    match store.docs.remove(&input.id) {
        Some(_) => Ok(Json(json!({ "deleted": true }))),
        None => Err(error_body(StatusCode::NOT_FOUND, "document not found")),
    }
}

async fn patch_doc(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<PatchBody>,
) -> Result<Json<Value>, ErrorResponse> {
    authorize(&state, &headers)?;
    let mut store = state.store.write().await;
    let stored = store
        .docs
        .get_mut(&input.id)
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "document not found"))?;
    if let Some(title) = input.title {
        stored.document.title = title;
    }
    if let Some(metadata) = input.metadata {
        stored.document.metadata = metadata;
    }
    stored.document.updated_at = Utc::now();
    Ok(Json(json!({ "document": stored.document })))
}

async fn list_docs(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ErrorResponse> {
    authorize(&state, &headers)?;
    let store = state.store.read().await;
    let mut documents: Vec<&Document> = store.docs.values().map(|s| &s.document).collect();
    documents.sort_by_key(|d| d.id);
    let total = documents.len();
    let page: Vec<&Document> = documents
        .into_iter()
        .skip(params.offset)
        .take(params.limit)
        .collect();
    Ok(Json(json!({ "documents": page, "total": total })))
}

async fn get_doc(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ErrorResponse> {
    authorize(&state, &headers)?;
    let store = state.store.read().await;
    match store.docs.get(&id) {
        Some(stored) => Ok(Json(json!({ "document": stored.document }))),
        None => Err(error_body(StatusCode::NOT_FOUND, "document not found")),
    }
}
