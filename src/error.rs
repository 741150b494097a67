//! Error types for the repository client

use crate::rdf::{ParseError, RdfError, SerializeError};
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to a repository
#[derive(Error, Debug)]
pub enum RepoError {
    /// An id lookup matched nothing
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// An id lookup matched more than one resource
    #[error("Ambiguous match: {0}")]
    AmbiguousMatch(String),

    /// The repository answered with a non-success status
    #[error("Transport error ({status}): {message}")]
    Transport { status: StatusCode, message: String },

    /// The request could not be sent or its response could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or incompatible configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Response body could not be decoded as RDF
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Metadata could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// Invalid RDF term
    #[error("RDF error: {0}")]
    Rdf(#[from] RdfError),

    /// Operation not allowed in the handle's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A paged cleanup returned only resources it had already processed
    #[error("Cleanup stalled for {0}")]
    CleanupStalled(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RepoError {
    /// HTTP status of a transport failure, if this is one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RepoError::Transport { status, .. } => Some(*status),
            RepoError::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
