//! Request dispatch to a repository
//!
//! [`Transport`] is the seam between the resource layer and the network.
//! Two implementations ship with the crate:
//!
//! - **[`HttpTransport`]**: talks to a running repository over HTTP.
//! - **[`MemoryRepository`]**: in-process repository emulation, no network.
//!   Ideal for tests and embedded use.

mod http;
mod memory;

pub use http::HttpTransport;
pub use memory::{LoggedRequest, MemoryRepository};

use crate::error::{RepoError, RepoResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Method, StatusCode};

/// A request against the repository API
#[derive(Debug, Clone)]
pub struct RepoRequest {
    pub method: Method,
    /// Absolute URL
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RepoRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of a header, compared case-insensitively
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response from the repository API
#[derive(Debug, Clone)]
pub struct RepoResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RepoResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of a header, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Body decoded as UTF-8
    pub fn text(&self) -> RepoResult<&str> {
        std::str::from_utf8(&self.body).map_err(|e| RepoError::Transport {
            status: self.status,
            message: format!("response body is not UTF-8: {}", e),
        })
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Sends requests to a repository.
///
/// Implementations return every response, whatever its status; status
/// handling is done by [`Repo`](crate::Repo).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RepoRequest) -> RepoResult<RepoResponse>;
}
