//! Integration tests for the HTTP transport against a loopback server
//!
//! The server echoes the scope headers it receives back as metadata, so the
//! tests see exactly what went over the wire.

mod common;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use common::*;
use rdfrepo::rdf::Literal;
use rdfrepo::{MetadataMode, Repo, RepoConfig, UpdateMode};
use std::sync::Arc;

const READ_MODE: &str = "https://vocab.example.org/readMode";
const PARENT: &str = "https://vocab.example.org/parentProperty";
const WRITE_MODE: &str = "https://vocab.example.org/writeMode";

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn ntriples(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/n-triples")], body)
}

async fn get_metadata(
    State(base): State<Arc<String>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let subject = format!("<{}{}>", base, id);
    ntriples(format!(
        "{s} <{m}> \"{mode}\" .\n{s} <{p}> \"{parent}\" .\n",
        s = subject,
        m = READ_MODE,
        mode = header_value(&headers, "x-metadata-read-mode"),
        p = PARENT,
        parent = header_value(&headers, "x-parent-property"),
    ))
}

async fn patch_metadata(
    State(base): State<Arc<String>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let subject = format!("<{}{}>", base, id);
    let mut response = String::from_utf8_lossy(&body).into_owned();
    response.push_str(&format!(
        "{} <{}> \"{}\" .\n",
        subject,
        WRITE_MODE,
        header_value(&headers, "x-metadata-write-mode")
    ));
    ntriples(response)
}

async fn get_content(Path(id): Path<u64>) -> impl IntoResponse {
    if id == 404 {
        return (StatusCode::NOT_FOUND, "no such resource").into_response();
    }
    ([(header::CONTENT_TYPE, "text/plain")], format!("content of {}", id)).into_response()
}

/// Serve the test API on an ephemeral port and connect to it
async fn serve() -> Repo {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url_base = format!("http://{}", addr);
    let base = Arc::new(format!("{}/api/", url_base));

    let app = Router::new()
        .route("/api/:id", get(get_content))
        .route("/api/:id/metadata", get(get_metadata).patch(patch_metadata))
        .with_state(base);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = RepoConfig::from_yaml_str(&format!(
        "rest:\n  urlBase: {}\n  pathBase: /api/\nschema:\n  parent: {}\n",
        url_base, PART_OF
    ))
    .unwrap();
    Repo::connect(config).unwrap()
}

#[tokio::test]
async fn test_relatives_load_over_http() {
    let repo = serve().await;
    let uri = format!("{}123", repo.base_url());

    let mut resource = repo.resource(&uri).unwrap();
    resource
        .load_metadata(true, MetadataMode::Relatives, Some("https://vocab.example.org/hasParent"))
        .await
        .unwrap();

    let metadata = resource.metadata().await.unwrap();
    assert_eq!(metadata.subject().as_str(), uri);
    assert_eq!(
        metadata.get_literal(&pred(READ_MODE)).map(|l| l.value()),
        Some("relatives")
    );
    assert_eq!(
        metadata.get_literal(&pred(PARENT)).map(|l| l.value()),
        Some("https://vocab.example.org/hasParent")
    );
}

#[tokio::test]
async fn test_resource_load_omits_parent_header() {
    let repo = serve().await;
    let mut resource = repo.resource(&format!("{}7", repo.base_url())).unwrap();

    let metadata = resource.metadata().await.unwrap();
    assert_eq!(metadata.get_literal(&pred(READ_MODE)).map(|l| l.value()), Some("resource"));
    assert_eq!(metadata.get_literal(&pred(PARENT)).map(|l| l.value()), Some(""));
}

#[tokio::test]
async fn test_metadata_patch_over_http() {
    let repo = serve().await;
    let mut resource = repo.resource(&format!("{}9", repo.base_url())).unwrap();

    resource
        .metadata_mut()
        .await
        .unwrap()
        .add_literal(pred(TITLE), Literal::new_simple_literal("Sent over the wire"));
    resource
        .update_metadata(UpdateMode::Overwrite, MetadataMode::Resource)
        .await
        .unwrap();

    assert!(resource.is_synced());
    let metadata = resource.metadata().await.unwrap();
    assert_eq!(metadata.get_literal(&pred(WRITE_MODE)).map(|l| l.value()), Some("overwrite"));
    assert_eq!(
        metadata.get_literal(&pred(TITLE)).map(|l| l.value()),
        Some("Sent over the wire")
    );
}

#[tokio::test]
async fn test_content_and_error_status() {
    let repo = serve().await;

    let resource = repo.resource(&format!("{}5", repo.base_url())).unwrap();
    let content = resource.get_content().await.unwrap();
    assert_eq!(content.text().unwrap(), "content of 5");
    assert_eq!(content.content_type(), Some("text/plain"));

    let missing = repo.resource(&format!("{}404", repo.base_url())).unwrap();
    let err = missing.get_content().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert!(err.to_string().contains("no such resource"));
}
