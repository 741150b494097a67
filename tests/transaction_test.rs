//! Integration tests for repository transactions

mod common;

use common::*;
use rdfrepo::rdf::Literal;
use rdfrepo::{MetadataMode, RepoError, UpdateMode};

#[tokio::test]
async fn test_requests_carry_transaction_id() {
    let (memory, repo) = setup();
    let uri = memory.insert(titled("Report")).await.unwrap();

    let id = repo.begin_transaction().await.unwrap();
    assert!(repo.in_transaction().await);
    assert_eq!(repo.transaction_id().await.as_deref(), Some(id.as_str()));

    let mut resource = repo.resource(uri.as_str()).unwrap();
    resource.load_metadata(false, MetadataMode::Resource, None).await.unwrap();
    repo.prolong().await.unwrap();
    repo.commit().await.unwrap();
    assert!(!repo.in_transaction().await);

    let requests = memory.requests().await;
    let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["POST", "GET", "PATCH", "PUT"]);
    assert_eq!(requests[0].header("X-TRANSACTION-ID"), None);
    for request in &requests[1..] {
        assert_eq!(request.header("X-TRANSACTION-ID"), Some(id.as_str()));
    }
}

#[tokio::test]
async fn test_rollback_restores_state() {
    let (memory, repo) = setup();
    let uri = memory.insert(titled("Original")).await.unwrap();

    repo.begin_transaction().await.unwrap();
    let mut resource = repo.resource(uri.as_str()).unwrap();
    let metadata = resource.metadata_mut().await.unwrap();
    metadata.delete_all(&pred(TITLE));
    metadata.add_literal(pred(TITLE), Literal::new_simple_literal("Changed"));
    resource.update_metadata(UpdateMode::Merge, MetadataMode::Resource).await.unwrap();

    let created = repo
        .create_resource(titled("Temporary"), None, MetadataMode::Resource)
        .await
        .unwrap();
    assert!(memory.contains(created.uri()).await);

    repo.rollback().await.unwrap();

    assert!(!memory.contains(created.uri()).await);
    let stored = memory.metadata_of(&uri).await.unwrap();
    assert_eq!(stored.get_literal(&pred(TITLE)).map(|l| l.value()), Some("Original"));
}

#[tokio::test]
async fn test_commit_keeps_changes() {
    let (memory, repo) = setup();

    repo.begin_transaction().await.unwrap();
    let created = repo
        .create_resource(titled("Kept"), None, MetadataMode::Resource)
        .await
        .unwrap();
    repo.commit().await.unwrap();

    assert!(memory.contains(created.uri()).await);
}

#[tokio::test]
async fn test_ending_without_transaction_fails() {
    let (memory, repo) = setup();

    assert!(matches!(repo.commit().await, Err(RepoError::InvalidState(_))));
    assert!(matches!(repo.rollback().await, Err(RepoError::InvalidState(_))));
    assert!(matches!(repo.prolong().await, Err(RepoError::InvalidState(_))));
    assert!(memory.requests().await.is_empty());
}

#[tokio::test]
async fn test_second_transaction_is_refused() {
    let (_memory, repo) = setup();
    let clone = repo.clone();

    repo.begin_transaction().await.unwrap();
    assert!(clone.in_transaction().await);

    let err = clone.begin_transaction().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(409));
}
