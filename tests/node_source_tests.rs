// FirebaseSource against a local stand-in for the document store REST API

use axum::{
    Router,
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use soilgraph::config::SourceConfig;
use soilgraph::node_source::{FirebaseSource, NodeSource, SourceError};

async fn nodes_handler(Path(user): Path<String>) -> Response {
    match user.as_str() {
        "alice" => axum::Json(json!({
            "node1": { "Packets": { "p0": { "timestamp": "2024-06-05T12:00:00Z", "moisture": 10 } } }
        }))
        .into_response(),
        "a/b c" => axum::Json(json!({ "echo": user })).into_response(),
        "nobody" => ([(header::CONTENT_TYPE, "application/json")], "null").into_response(),
        "broken" => ([(header::CONTENT_TYPE, "text/html")], "<html>oops</html>").into_response(),
        _ => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Serves `/db/Users/{user}/Farm/Nodes.json` on an ephemeral port; returns the base url.
async fn spawn_store() -> String {
    let app = Router::new().route("/db/Users/{user}/Farm/Nodes.json", get(nodes_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/db", addr)
}

fn source(base_url: String) -> FirebaseSource {
    FirebaseSource::new(&SourceConfig {
        base_url,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn fetch_nodes_reads_tree_from_built_url() {
    let source = source(spawn_store().await);
    let nodes = source.fetch_nodes("alice").await.unwrap();
    assert_eq!(nodes["node1"]["Packets"]["p0"]["moisture"], 10);

    let echoed = source.fetch_nodes("a/b c").await.unwrap();
    assert_eq!(echoed["echo"], "a/b c");
}

#[tokio::test]
async fn fetch_nodes_passes_null_through() {
    let source = source(spawn_store().await);
    let nodes = source.fetch_nodes("nobody").await.unwrap();
    assert_eq!(nodes, Value::Null);
}

#[tokio::test]
async fn fetch_nodes_non_success_status_is_status_error() {
    let source = source(spawn_store().await);
    let err = source.fetch_nodes("mallory").await.unwrap_err();
    assert!(matches!(err, SourceError::Status(503)), "{:?}", err);
}

#[tokio::test]
async fn fetch_nodes_non_json_body_is_decode_error() {
    let source = source(spawn_store().await);
    let err = source.fetch_nodes("broken").await.unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)), "{:?}", err);
}
