//! HttpTransport: network transport for a running repository

use super::{RepoRequest, RepoResponse, Transport};
use crate::config::RestConfig;
use crate::error::{RepoError, RepoResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Transport backed by a pooled `reqwest` client.
///
/// Cheap to share: clones of the inner client reuse its connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport honouring the configured timeout.
    ///
    /// # Example
    /// ```no_run
    /// # use rdfrepo::{RepoConfig, HttpTransport};
    /// let config = RepoConfig::from_yaml_str("rest:\n  urlBase: http://localhost:8080\n").unwrap();
    /// let transport = HttpTransport::new(&config.rest).unwrap();
    /// ```
    pub fn new(config: &RestConfig) -> RepoResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RepoError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RepoRequest) -> RepoResult<RepoResponse> {
        debug!("{} {}", request.method, request.url);
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(RepoResponse {
            status,
            headers,
            body,
        })
    }
}
