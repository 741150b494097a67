//! Client for HTTP repositories of RDF-described resources
//!
//! Each repository resource has a stable URI, an RDF metadata graph and
//! optionally binary content. This crate resolves resources, searches them,
//! edits their metadata locally and writes it back, and deletes them together
//! with every reference other resources hold to them.
//!
//! # Layout
//!
//! - [`Repo`]: connection to one repository (lookup, search, creation,
//!   transactions)
//! - [`RepoResource`]: handle to one resource, tracking whether its local
//!   metadata is unloaded, synced, dirty or deleted
//! - [`Schema`]: logical names of the predicates a repository uses
//! - [`search`]: filter terms, request options and result sequences
//! - [`rdf`]: the RDF model and the N-Triples / Turtle / RDF-XML codecs
//! - [`transport`]: the request seam, with an HTTP implementation and an
//!   in-memory repository
//!
//! ## Example Usage
//!
//! ```rust
//! use rdfrepo::{MemoryRepository, MetadataMode, Repo, RepoConfig, UpdateMode};
//! use rdfrepo::rdf::{Literal, Metadata, NamedNode, RdfPredicate};
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let config = RepoConfig::from_yaml_str(r#"
//! rest:
//!   urlBase: https://repo.example.org
//!   pathBase: /api/
//! schema:
//!   id: https://vocab.example.org/hasIdentifier
//!   delete: delete://delete
//!   search:
//!     match: search://match
//!     count: search://count
//!     order: search://order
//! "#).unwrap();
//! let memory = Arc::new(MemoryRepository::new(&config));
//! let repo = Repo::new(config, memory.clone()).unwrap();
//!
//! let title = RdfPredicate::new("https://vocab.example.org/title").unwrap();
//! let mut draft = Metadata::new(NamedNode::new("https://example.org/draft").unwrap());
//! draft.add_literal(title.clone(), Literal::new_simple_literal("Report"));
//!
//! let mut resource = repo.create_resource(draft, None, MetadataMode::Resource).await.unwrap();
//! resource.metadata_mut().await.unwrap()
//!     .add_literal(title, Literal::new_simple_literal("Annual report"));
//! resource.update_metadata(UpdateMode::Merge, MetadataMode::Resource).await.unwrap();
//! assert!(resource.is_synced());
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod mode;
pub mod rdf;
pub mod repo;
pub mod resource;
pub mod schema;
pub mod search;
pub mod transport;

// Re-export main types for convenience
pub use config::{HeaderNames, RepoConfig, RestConfig};

pub use error::{RepoError, RepoResult};

pub use mode::{MetadataMode, UpdateMode};

pub use repo::Repo;

pub use resource::{
    BinaryPayload, RepoResource, SyncState, CLEANUP_BATCH_SIZE, REFERENCES_QUERY,
    RELATIVES_QUERY,
};

pub use schema::Schema;

pub use search::{Operator, ResourceSequence, SearchConfig, SearchTerm, ValueType};

pub use transport::{
    HttpTransport, LoggedRequest, MemoryRepository, RepoRequest, RepoResponse, Transport,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, env!("CARGO_PKG_VERSION"));
    }
}
