//! Client library for the Étoile hosted search API.
//!
//! # Overview
//! A thin client: validates caller inputs, shapes and serializes requests,
//! executes one HTTP exchange per operation, and deserializes responses.
//! All substantive computation (embedding, ranking, metadata filtering,
//! AI-based filter extraction) happens server-side.
//!
//! # Design
//! - `EtoileClient` is stateless — it holds only the API key and base URL.
//! - Each operation is split into `build_*` (validates input, produces a
//!   request) and `parse_*` (consumes a response); the high-level methods
//!   wire the two through the one-shot transport. Hosts that do their own
//!   I/O can use the halves directly.
//! - Invalid input never reaches the network: validation rejects before a
//!   request is built.
//! - Every failure is one `ApiError` variant, tagged where it first occurs.

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::{EtoileClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    ClientConfig, DeleteResponse, Document, FilterCondition, FilterOperator, FilterValue,
    GetResponse, IndexRequest, IndexResponse, ListRequest, ListResponse, Metadata, SearchRequest,
    SearchResponse, SearchResult, UpdateRequest, UpdateResponse,
};
