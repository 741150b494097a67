//! Shared fixtures for the integration tests

#![allow(dead_code)]

use rdfrepo::rdf::{Literal, Metadata, NamedNode, RdfPredicate};
use rdfrepo::{LoggedRequest, MemoryRepository, Repo, RepoConfig};
use std::sync::Arc;

pub const BASE: &str = "https://repo.example.org/api/";

pub const ID: &str = "https://vocab.example.org/hasIdentifier";
pub const TITLE: &str = "https://vocab.example.org/hasTitle";
pub const PART_OF: &str = "https://vocab.example.org/isPartOf";
pub const RELATION: &str = "https://vocab.example.org/hasRelation";
pub const SIZE: &str = "https://vocab.example.org/hasBinarySize";
pub const HASH: &str = "https://vocab.example.org/hasHash";
pub const FORMAT: &str = "https://vocab.example.org/hasFormat";
pub const FILENAME: &str = "https://vocab.example.org/hasFilename";
pub const DELETE: &str = "delete://delete";

pub const CONFIG: &str = r#"
rest:
  urlBase: https://repo.example.org
  pathBase: /api/
  timeoutSecs: 5
schema:
  id: https://vocab.example.org/hasIdentifier
  parent: https://vocab.example.org/isPartOf
  delete: delete://delete
  binarySize: https://vocab.example.org/hasBinarySize
  hash: https://vocab.example.org/hasHash
  mime: https://vocab.example.org/hasFormat
  fileName: https://vocab.example.org/hasFilename
  search:
    match: search://match
    count: search://count
    order: search://order
"#;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn config() -> RepoConfig {
    RepoConfig::from_yaml_str(CONFIG).unwrap()
}

/// In-memory repository and a connection to it
pub fn setup() -> (Arc<MemoryRepository>, Repo) {
    init_tracing();
    let config = config();
    let memory = Arc::new(MemoryRepository::new(&config));
    let repo = Repo::new(config, memory.clone()).unwrap();
    (memory, repo)
}

pub fn node(iri: &str) -> NamedNode {
    NamedNode::new(iri).unwrap()
}

pub fn pred(iri: &str) -> RdfPredicate {
    RdfPredicate::new(iri).unwrap()
}

/// Draft metadata with a title; the subject is replaced on insert
pub fn titled(title: &str) -> Metadata {
    let mut meta = Metadata::new(node("https://example.org/draft"));
    meta.add_literal(pred(TITLE), Literal::new_simple_literal(title));
    meta
}

/// Draft metadata with a title and one relation
pub fn linked(title: &str, property: &str, target: &NamedNode) -> Metadata {
    let mut meta = titled(title);
    meta.add_resource(pred(property), target.clone());
    meta
}

pub fn with_method<'a>(requests: &'a [LoggedRequest], method: &str) -> Vec<&'a LoggedRequest> {
    requests
        .iter()
        .filter(|r| r.method.as_str() == method)
        .collect()
}
