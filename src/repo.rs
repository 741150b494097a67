//! Repo: connection to one repository
//!
//! Resolves identifiers, runs searches, creates resources and dispatches
//! every request made by resource handles.

use crate::config::{HeaderNames, RepoConfig};
use crate::error::{RepoError, RepoResult};
use crate::mode::{MetadataMode, UpdateMode};
use crate::rdf::{Metadata, RdfParser};
use crate::resource::{BinaryPayload, RepoResource};
use crate::schema::Schema;
use crate::search::{form, ResourceSequence, SearchConfig, SearchTerm, ValueType};
use crate::transport::{HttpTransport, RepoRequest, RepoResponse, Transport};
use oxiri::Iri;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::Method;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

struct RepoInner {
    config: RepoConfig,
    base_url: String,
    schema: Schema,
    transport: Arc<dyn Transport>,
    transaction: RwLock<Option<String>>,
}

/// Connection to a repository.
///
/// Cheap to clone; clones share the transport and the transaction state, so
/// a `Repo` can be handed to any number of resource handles and tasks.
#[derive(Clone)]
pub struct Repo {
    inner: Arc<RepoInner>,
}

impl Repo {
    /// Create a connection over an arbitrary transport
    pub fn new(config: RepoConfig, transport: Arc<dyn Transport>) -> RepoResult<Self> {
        let base_url = config.base_url();
        Iri::parse(base_url.as_str()).map_err(|e| {
            RepoError::Configuration(format!("invalid base URL '{}': {}", base_url, e))
        })?;
        let schema = Schema::new(config.schema.clone());
        Ok(Self {
            inner: Arc::new(RepoInner {
                config,
                base_url,
                schema,
                transport,
                transaction: RwLock::new(None),
            }),
        })
    }

    /// Connect over HTTP
    pub fn connect(config: RepoConfig) -> RepoResult<Self> {
        let transport = HttpTransport::new(&config.rest)?;
        Self::new(config, Arc::new(transport))
    }

    /// Connect over HTTP using a YAML configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::connect(RepoConfig::from_file(path)?)
    }

    /// API base URL, ending with `/`
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    pub fn config(&self) -> &RepoConfig {
        &self.inner.config
    }

    /// Wire name of a repository-specific header, by logical name
    pub fn header_name(&self, logical_name: &str) -> Option<&str> {
        self.inner.config.rest.headers.get(logical_name)
    }

    pub(crate) fn headers(&self) -> &HeaderNames {
        &self.inner.config.rest.headers
    }

    /// Send a request, attaching the current transaction.
    ///
    /// Non-success statuses are turned into [`RepoError::Transport`].
    pub async fn send_request(&self, mut request: RepoRequest) -> RepoResult<RepoResponse> {
        if let Some(transaction) = self.inner.transaction.read().await.as_ref() {
            let name = &self.headers().transaction_id;
            if request.header_value(name).is_none() {
                request.headers.push((name.clone(), transaction.clone()));
            }
        }
        let method = request.method.clone();
        let url = request.url.clone();

        let response = self.inner.transport.send(request).await?;
        debug!("{} {} -> {}", method, url, response.status);
        if response.status.is_success() {
            return Ok(response);
        }

        let body = String::from_utf8_lossy(&response.body).trim().to_string();
        let message = if body.is_empty() {
            format!(
                "{} {}: {}",
                method,
                url,
                response.status.canonical_reason().unwrap_or("request failed")
            )
        } else {
            format!("{} {}: {}", method, url, body)
        };
        Err(RepoError::Transport {
            status: response.status,
            message,
        })
    }

    /// Handle for a known resource URI; nothing is fetched
    pub fn resource(&self, uri: &str) -> RepoResult<RepoResource> {
        RepoResource::new(self.clone(), uri)
    }

    /// Resolve one identifier
    pub async fn get_resource_by_id(&self, id: &str) -> RepoResult<RepoResource> {
        self.get_resource_by_ids(&[id]).await
    }

    /// Resolve a set of identifiers that must all denote the same resource.
    ///
    /// Fails with [`RepoError::NotFound`] when nothing matches and with
    /// [`RepoError::AmbiguousMatch`] when the identifiers resolve to more than
    /// one resource.
    pub async fn get_resource_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> RepoResult<RepoResource> {
        let ids: Vec<String> = ids.iter().map(|id| id.as_ref().to_string()).collect();
        if ids.is_empty() {
            return Err(RepoError::NotFound("no identifiers given".to_string()));
        }
        let id_property = self.schema().id()?;
        let term = SearchTerm::any_of(id_property.as_str(), ids.iter().cloned())
            .with_type(ValueType::Relation);
        let mut config = SearchConfig {
            metadata_mode: Some(MetadataMode::Resource),
            ..Default::default()
        };

        let mut matches = self.get_resources_by_search_terms(&[term], &mut config).await?;
        match matches.remaining() {
            0 => Err(RepoError::NotFound(ids.join(", "))),
            1 => matches
                .next()
                .ok_or_else(|| RepoError::NotFound(ids.join(", "))),
            n => Err(RepoError::AmbiguousMatch(format!(
                "{} resources match {}",
                n,
                ids.join(", ")
            ))),
        }
    }

    /// Resources matching all `terms`.
    ///
    /// `config.count` receives the total number of matches.
    pub async fn get_resources_by_search_terms(
        &self,
        terms: &[SearchTerm],
        config: &mut SearchConfig,
    ) -> RepoResult<ResourceSequence> {
        let form = terms
            .iter()
            .enumerate()
            .flat_map(|(n, term)| term.to_form_data(n))
            .collect();
        self.search(form, config).await
    }

    /// Resources returned by a server-side SQL query selecting `id`s.
    ///
    /// `config.count` receives the total number of matches.
    pub async fn get_resources_by_sql_query<S: AsRef<str>>(
        &self,
        query: &str,
        params: &[S],
        config: &mut SearchConfig,
    ) -> RepoResult<ResourceSequence> {
        let mut form = vec![("sql".to_string(), query.to_string())];
        form.extend(
            params
                .iter()
                .map(|p| ("sqlParam[]".to_string(), p.as_ref().to_string())),
        );
        self.search(form, config).await
    }

    async fn search(
        &self,
        mut form: Vec<(String, String)>,
        config: &mut SearchConfig,
    ) -> RepoResult<ResourceSequence> {
        form.extend(config.to_query());
        let mut request = RepoRequest::new(Method::POST, format!("{}search", self.base_url()))
            .header(CONTENT_TYPE.as_str(), form::FORM_CONTENT_TYPE)
            .body(form::encode(&form));
        for (name, value) in config.headers(self.headers()) {
            request = request.header(name, value);
        }

        let response = self.send_request(request).await?;
        let graph = RdfParser::parse_response(&response.body, response.content_type(), Some(self.base_url()))?;
        let sequence = ResourceSequence::from_response(
            self.clone(),
            graph,
            config.metadata_mode.unwrap_or_default(),
        )?;
        config.count = Some(sequence.total_count());
        debug!(
            "Search matched {} resources, {} in this page",
            sequence.total_count(),
            sequence.remaining()
        );
        Ok(sequence)
    }

    /// Create a resource with the given metadata and optional binary content.
    ///
    /// The metadata's root triples are moved onto the new resource's URI.
    pub async fn create_resource(
        &self,
        metadata: Metadata,
        binary: Option<BinaryPayload>,
        read_mode: MetadataMode,
    ) -> RepoResult<RepoResource> {
        let mut request = RepoRequest::new(Method::POST, self.base_url());
        if let Some(binary) = binary {
            request = binary.attach(request);
        }
        let response = self.send_request(request).await?;
        let location = response.header(LOCATION.as_str()).ok_or_else(|| RepoError::Transport {
            status: response.status,
            message: "resource created without a Location header".to_string(),
        })?;

        let mut resource = RepoResource::new(self.clone(), location)?;
        info!("Created resource {}", location);
        resource.set_metadata(metadata)?;
        resource.update_metadata(UpdateMode::Merge, read_mode).await?;
        Ok(resource)
    }

    /// Start a transaction; subsequent requests through this connection and
    /// its clones carry its id until commit or rollback.
    pub async fn begin_transaction(&self) -> RepoResult<String> {
        let request = RepoRequest::new(Method::POST, format!("{}transaction", self.base_url()));
        let response = self.send_request(request).await?;
        let name = &self.headers().transaction_id;
        let id = response
            .header(name)
            .map(str::to_string)
            .ok_or_else(|| RepoError::Transport {
                status: response.status,
                message: format!("transaction started without a {} header", name),
            })?;
        *self.inner.transaction.write().await = Some(id.clone());
        info!("Began transaction {}", id);
        Ok(id)
    }

    /// Commit the current transaction
    pub async fn commit(&self) -> RepoResult<()> {
        self.end_transaction(Method::PUT).await?;
        Ok(())
    }

    /// Roll back the current transaction
    pub async fn rollback(&self) -> RepoResult<()> {
        self.end_transaction(Method::DELETE).await?;
        Ok(())
    }

    /// Keep the current transaction from timing out
    pub async fn prolong(&self) -> RepoResult<()> {
        self.require_transaction().await?;
        let request = RepoRequest::new(Method::PATCH, format!("{}transaction", self.base_url()));
        self.send_request(request).await?;
        Ok(())
    }

    pub async fn in_transaction(&self) -> bool {
        self.inner.transaction.read().await.is_some()
    }

    pub async fn transaction_id(&self) -> Option<String> {
        self.inner.transaction.read().await.clone()
    }

    async fn require_transaction(&self) -> RepoResult<String> {
        self.transaction_id()
            .await
            .ok_or_else(|| RepoError::InvalidState("no transaction in progress".to_string()))
    }

    async fn end_transaction(&self, method: Method) -> RepoResult<()> {
        let id = self.require_transaction().await?;
        let committing = method == Method::PUT;
        let request = RepoRequest::new(method, format!("{}transaction", self.base_url()));
        let result = self.send_request(request).await;
        // the server discards the transaction either way
        *self.inner.transaction.write().await = None;
        result?;
        if committing {
            info!("Committed transaction {}", id);
        } else {
            info!("Rolled back transaction {}", id);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repo")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
