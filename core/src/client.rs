//! Stateless client facade for the Étoile search API.
//!
//! # Design
//! `EtoileClient` holds only the normalized configuration (API key, base
//! URL) and carries no mutable state between calls. Each operation is split
//! into a `build_*` method that validates input and produces an
//! `HttpRequest`, and a `parse_*` method that consumes an `HttpResponse`;
//! the high-level methods (`index`, `search`, ...) run build → execute →
//! parse with the crate's own transport. The build/parse halves stay public
//! so tests and embedding hosts can drive the deterministic part without a
//! network.
//!
//! Validation failures reject before any request exists, so no network
//! round-trip is spent on client-detectable errors.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport;
use crate::types::{
    ClientConfig, DeleteResponse, GetResponse, IndexRequest, IndexResponse, ListRequest,
    ListResponse, SearchRequest, SearchResponse, UpdateRequest, UpdateResponse,
};
use crate::validate;

/// Public API root used when `ClientConfig::base_url` is not supplied.
pub const DEFAULT_BASE_URL: &str = "https://api.etoile.dev/v1";

const DEFAULT_SEARCH_LIMIT: usize = 10;
const DEFAULT_LIST_LIMIT: usize = 20;

/// Synchronous client for the Étoile search API.
///
/// Cheap to clone; concurrent callers share only the read-only
/// configuration.
#[derive(Debug, Clone)]
pub struct EtoileClient {
    api_key: String,
    base_url: String,
}

impl EtoileClient {
    /// Construct a client from `config`.
    ///
    /// Fails with `InvalidInput` when the API key is blank. A missing
    /// `base_url` falls back to [`DEFAULT_BASE_URL`]; trailing slashes are
    /// stripped either way.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        validate::validate_api_key(&config.api_key)?;
        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            api_key: config.api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, with_body: bool) -> Vec<(String, String)> {
        let mut headers = vec![(
            "authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )];
        if with_body {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        headers
    }

    fn json_body<T: serde::Serialize>(input: &T) -> Result<String, ApiError> {
        serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))
    }

    // -- build_* ------------------------------------------------------------

    pub fn build_index(&self, input: &IndexRequest) -> Result<HttpRequest, ApiError> {
        validate::validate_index(input)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/index", self.base_url),
            headers: self.headers(true),
            body: Some(Self::json_body(input)?),
        })
    }

    /// Shape and build a search request. Defaults (`limit` 10, `offset` 0)
    /// are filled in here; `filters`/`autoFilters` appear in the body only
    /// when the caller set them.
    pub fn build_search(&self, input: &SearchRequest) -> Result<HttpRequest, ApiError> {
        validate::validate_search(input)?;
        let mut shaped = input.clone();
        shaped.limit = Some(shaped.limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
        shaped.offset = Some(shaped.offset.unwrap_or(0));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/search", self.base_url),
            headers: self.headers(true),
            body: Some(Self::json_body(&shaped)?),
        })
    }

    pub fn build_delete(&self, id: &str) -> Result<HttpRequest, ApiError> {
        validate::require_non_blank("id", id)?;
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/documents", self.base_url),
            headers: self.headers(true),
            body: Some(serde_json::json!({ "id": id }).to_string()),
        })
    }

    pub fn build_update(&self, input: &UpdateRequest) -> Result<HttpRequest, ApiError> {
        validate::validate_update(input)?;
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            url: format!("{}/documents", self.base_url),
            headers: self.headers(true),
            body: Some(Self::json_body(input)?),
        })
    }

    pub fn build_list(&self, input: &ListRequest) -> Result<HttpRequest, ApiError> {
        validate::validate_list(input)?;
        let limit = input.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let offset = input.offset.unwrap_or(0);
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/documents?limit={limit}&offset={offset}", self.base_url),
            headers: self.headers(false),
            body: None,
        })
    }

    pub fn build_get(&self, id: &str) -> Result<HttpRequest, ApiError> {
        validate::require_non_blank("id", id)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/documents/{}", self.base_url, urlencoding::encode(id)),
            headers: self.headers(false),
            body: None,
        })
    }

    // -- parse_* ------------------------------------------------------------

    pub fn parse_index(&self, response: HttpResponse) -> Result<IndexResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_search(&self, response: HttpResponse) -> Result<SearchResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<DeleteResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<UpdateResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<ListResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<GetResponse, ApiError> {
        parse_json(response)
    }

    // -- high-level operations ----------------------------------------------

    /// Index (or re-index) a document.
    pub fn index(&self, input: &IndexRequest) -> Result<IndexResponse, ApiError> {
        let request = self.build_index(input)?;
        self.parse_index(transport::execute(&request)?)
    }

    /// Search the given collections.
    pub fn search(&self, input: &SearchRequest) -> Result<SearchResponse, ApiError> {
        let request = self.build_search(input)?;
        self.parse_search(transport::execute(&request)?)
    }

    /// Delete a document by its external id.
    pub fn delete(&self, id: &str) -> Result<DeleteResponse, ApiError> {
        let request = self.build_delete(id)?;
        self.parse_delete(transport::execute(&request)?)
    }

    /// Patch a document's title and/or metadata.
    pub fn update(&self, input: &UpdateRequest) -> Result<UpdateResponse, ApiError> {
        let request = self.build_update(input)?;
        self.parse_update(transport::execute(&request)?)
    }

    /// List indexed documents with paging.
    pub fn list(&self, input: &ListRequest) -> Result<ListResponse, ApiError> {
        let request = self.build_list(input)?;
        self.parse_list(transport::execute(&request)?)
    }

    /// Fetch a single document by its external id.
    pub fn get(&self, id: &str) -> Result<GetResponse, ApiError> {
        let request = self.build_get(id)?;
        self.parse_get(transport::execute(&request)?)
    }
}

/// Map a non-2xx response to `Remote`, substituting the generic error body
/// when the server's body is not a JSON object.
fn success_body(response: HttpResponse) -> Result<String, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }
    let body = match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(value) if value.is_object() => value,
        _ => serde_json::json!({ "error": "Request failed." }),
    };
    Err(ApiError::Remote {
        status: response.status,
        body,
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let body = success_body(response)?;
    serde_json::from_str(&body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
