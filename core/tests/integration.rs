//! Full lifecycle test against the live mock server.
//!
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP: index, search (plain, filtered, auto-filtered),
//! get, list, update, delete, plus the auth-failure and connection-refused
//! error paths.

use etoile_core::{
    ApiError, ClientConfig, EtoileClient, FilterCondition, FilterOperator, FilterValue,
    IndexRequest, ListRequest, SearchRequest, UpdateRequest,
};

const API_KEY: &str = "integration-key";

fn spawn_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, API_KEY).await
        })
        .unwrap();
    });

    addr
}

fn index_input(id: &str, title: &str, content: &str) -> IndexRequest {
    IndexRequest {
        id: id.to_string(),
        collection: "products".to_string(),
        title: title.to_string(),
        content: content.to_string(),
        metadata: None,
    }
}

fn search_input(query: &str) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        collections: vec!["products".to_string()],
        ..Default::default()
    }
}

#[test]
fn document_lifecycle() {
    let addr = spawn_server();
    let client =
        EtoileClient::new(ClientConfig::new(API_KEY).with_base_url(format!("http://{addr}")))
            .unwrap();

    // Step 1: list — empty store.
    let listed = client.list(&ListRequest::default()).unwrap();
    assert!(listed.documents.is_empty());
    assert_eq!(listed.total, 0);

    // Step 2: index two documents, one with metadata.
    let indexed = client
        .index(&index_input("lamp-1", "Ceramic table lamp", "warm light"))
        .unwrap();
    assert_eq!(indexed.document.external_id, "lamp-1");
    assert_eq!(indexed.document.doc_type, "text");

    let mut metadata = etoile_core::Metadata::new();
    metadata.insert("category".to_string(), serde_json::json!("kitchen"));
    let mut with_meta = index_input("kettle-1", "Copper kettle", "stovetop kettle");
    with_meta.metadata = Some(metadata);
    client.index(&with_meta).unwrap();

    // Step 3: get.
    let fetched = client.get("lamp-1").unwrap();
    assert_eq!(fetched.document.id, indexed.document.id);
    assert_eq!(fetched.document.title, "Ceramic table lamp");

    // Step 4: plain search.
    let found = client.search(&search_input("table lamp")).unwrap();
    assert_eq!(found.query, "table lamp");
    assert_eq!(found.results.len(), 1);
    assert_eq!(found.results[0].external_id, "lamp-1");
    assert!(found.results[0].score > 0.0 && found.results[0].score <= 1.0);
    assert!(found.applied_filters.is_none());
    assert!(found.refined_query.is_none());

    // Step 5: filtered search.
    let mut filtered = search_input("kettle");
    filtered.filters = Some(vec![FilterCondition {
        key: "category".to_string(),
        operator: FilterOperator::Eq,
        value: FilterValue::Str("kitchen".to_string()),
    }]);
    let found = client.search(&filtered).unwrap();
    assert_eq!(found.results.len(), 1);
    assert_eq!(found.results[0].external_id, "kettle-1");
    let applied = found.applied_filters.unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].key, "category");

    // Step 6: auto-filtered search.
    let mut auto = search_input("category:kitchen kettle");
    auto.auto_filters = Some(true);
    let found = client.search(&auto).unwrap();
    assert_eq!(found.refined_query.as_deref(), Some("kettle"));
    assert_eq!(found.results.len(), 1);
    assert!(found.applied_filters.is_some());

    // Step 7: update title.
    let updated = client
        .update(&UpdateRequest {
            id: "lamp-1".to_string(),
            title: Some("Brass table lamp".to_string()),
            metadata: None,
        })
        .unwrap();
    assert_eq!(updated.document.title, "Brass table lamp");
    assert!(updated.document.updated_at >= updated.document.created_at);

    // Step 8: list — both documents, ordered by numeric id.
    let listed = client.list(&ListRequest::default()).unwrap();
    assert_eq!(listed.total, 2);
    assert_eq!(listed.documents[0].external_id, "lamp-1");

    // Step 9: delete, then get — remote 404 with the server's error body.
    let deleted = client.delete("lamp-1").unwrap();
    assert!(deleted.deleted);

    let err = client.get("lamp-1").unwrap_err();
    match err {
        ApiError::Remote { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body["error"], "document not found");
        }
        other => panic!("expected Remote, got {other:?}"),
    }

    // Step 10: delete again — still 404.
    let err = client.delete("lamp-1").unwrap_err();
    assert!(matches!(err, ApiError::Remote { status: 404, .. }));
}

#[test]
fn wrong_api_key_is_rejected_remotely() {
    let addr = spawn_server();
    let client =
        EtoileClient::new(ClientConfig::new("not-the-key").with_base_url(format!("http://{addr}")))
            .unwrap();

    let err = client.list(&ListRequest::default()).unwrap_err();
    match err {
        ApiError::Remote { status, body } => {
            assert_eq!(status, 401);
            assert!(body["error"].is_string());
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[test]
fn connection_refused_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        EtoileClient::new(ClientConfig::new(API_KEY).with_base_url(format!("http://{addr}")))
            .unwrap();
    let err = client.list(&ListRequest::default()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn invalid_input_never_reaches_the_network() {
    // Unroutable base URL: if validation let this through, the call would
    // surface a transport error instead of InvalidInput.
    let client = EtoileClient::new(
        ClientConfig::new(API_KEY).with_base_url("http://127.0.0.1:1".to_string()),
    )
    .unwrap();

    let mut input = search_input("lamp");
    input.collections = vec![];
    let err = client.search(&input).unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
}
