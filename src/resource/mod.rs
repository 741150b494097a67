//! Resource handles
//!
//! A [`RepoResource`] wraps one repository resource: its URI, a local copy of
//! its metadata and the synchronisation state of that copy.
//!
//! ```text
//!   Unloaded --load--> Synced --edit--> Dirty --update_metadata--> Synced
//!       \                 \                \
//!        +-----------------+----------------+--delete--> Deleted
//! ```
//!
//! Every mutation of the local metadata goes through the handle, so the state
//! always tells whether a write-back is needed.

mod binary;
mod delete;

pub use binary::BinaryPayload;
pub use delete::{CLEANUP_BATCH_SIZE, REFERENCES_QUERY, RELATIVES_QUERY};

pub(crate) use binary::disposition_filename;

use crate::error::{RepoError, RepoResult};
use crate::mode::{MetadataMode, UpdateMode};
use crate::rdf::{Metadata, NamedNode, RdfParser, RdfSerializer, RdfFormat, NTRIPLES_CONTENT_TYPE};
use crate::repo::Repo;
use crate::transport::{RepoRequest, RepoResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use tracing::debug;

/// Synchronisation state of a handle's local metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    /// Nothing fetched yet
    Unloaded,
    /// Local metadata equals what the repository last returned
    Synced,
    /// Local metadata has edits not yet written back
    Dirty,
    /// The resource was deleted through this handle
    Deleted,
}

/// Handle to one repository resource
#[derive(Debug, Clone)]
pub struct RepoResource {
    repo: Repo,
    uri: NamedNode,
    metadata: Option<Metadata>,
    state: SyncState,
}

impl RepoResource {
    /// Handle for `uri`; nothing is fetched.
    ///
    /// Fails with [`RepoError::Configuration`] when `uri` does not belong to
    /// the repository `repo` is connected to.
    pub fn new(repo: Repo, uri: &str) -> RepoResult<Self> {
        if !uri.starts_with(repo.base_url()) {
            return Err(RepoError::Configuration(format!(
                "{} is not a resource of {}",
                uri,
                repo.base_url()
            )));
        }
        let uri = NamedNode::new(uri)?;
        Ok(Self {
            repo,
            uri,
            metadata: None,
            state: SyncState::Unloaded,
        })
    }

    /// Handle with metadata that was already delivered by the repository
    pub(crate) fn from_metadata(repo: Repo, metadata: Metadata) -> Self {
        Self {
            repo,
            uri: metadata.subject().clone(),
            metadata: Some(metadata),
            state: SyncState::Synced,
        }
    }

    pub fn uri(&self) -> &NamedNode {
        &self.uri
    }

    pub fn repo(&self) -> &Repo {
        &self.repo
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_synced(&self) -> bool {
        self.state == SyncState::Synced
    }

    pub fn is_deleted(&self) -> bool {
        self.state == SyncState::Deleted
    }

    /// Numeric repository id: the part of the URI after the base URL
    pub fn internal_id(&self) -> RepoResult<u64> {
        self.uri
            .as_str()
            .strip_prefix(self.repo.base_url())
            .and_then(|suffix| suffix.parse::<u64>().ok())
            .ok_or_else(|| {
                RepoError::Configuration(format!("{} has no numeric repository id", self.uri.as_str()))
            })
    }

    fn ensure_not_deleted(&self) -> RepoResult<()> {
        if self.state == SyncState::Deleted {
            return Err(RepoError::InvalidState(format!(
                "{} has been deleted",
                self.uri.as_str()
            )));
        }
        Ok(())
    }

    fn metadata_url(&self) -> String {
        format!("{}/metadata", self.uri.as_str())
    }

    /// Fetch the metadata from the repository.
    ///
    /// Does nothing when metadata is already present and `force` is false.
    /// `parent_property` only applies to [`MetadataMode::Relatives`] and
    /// defaults to the schema's parent property.
    pub async fn load_metadata(
        &mut self,
        force: bool,
        mode: MetadataMode,
        parent_property: Option<&str>,
    ) -> RepoResult<()> {
        self.ensure_not_deleted()?;
        if self.metadata.is_some() && !force {
            return Ok(());
        }

        let headers = self.repo.headers();
        let mut request = RepoRequest::new(Method::GET, self.metadata_url())
            .header(ACCEPT.as_str(), NTRIPLES_CONTENT_TYPE)
            .header(headers.metadata_read_mode.clone(), mode.as_str());
        if mode == MetadataMode::Relatives {
            let parent = match parent_property {
                Some(parent) => parent.to_string(),
                None => self.repo.schema().parent()?.as_str().to_string(),
            };
            request = request.header(headers.metadata_parent_property.clone(), parent);
        }

        let response = self.repo.send_request(request).await?;
        self.replace_metadata(&response)?;
        debug!("Loaded {} metadata of {}", mode, self.uri);
        Ok(())
    }

    fn replace_metadata(&mut self, response: &RepoResponse) -> RepoResult<()> {
        let graph = RdfParser::parse_response(&response.body, response.content_type(), Some(self.uri.as_str()))?;
        self.metadata = Some(Metadata::from_graph(self.uri.clone(), graph));
        self.state = SyncState::Synced;
        Ok(())
    }

    /// Local metadata, fetched in resource scope if not loaded yet
    pub async fn metadata(&mut self) -> RepoResult<&Metadata> {
        self.load_metadata(false, MetadataMode::Resource, None).await?;
        self.metadata
            .as_ref()
            .ok_or_else(|| RepoError::InvalidState(format!("{} has no metadata", self.uri)))
    }

    /// Mutable access to the local metadata; the handle becomes dirty
    pub async fn metadata_mut(&mut self) -> RepoResult<&mut Metadata> {
        self.load_metadata(false, MetadataMode::Resource, None).await?;
        self.state = SyncState::Dirty;
        self.metadata
            .as_mut()
            .ok_or_else(|| RepoError::InvalidState(format!("{} has no metadata", self.uri)))
    }

    /// Replace the local metadata.
    ///
    /// The graph is taken by value; its root triples are moved onto this
    /// resource's URI. Nothing is sent until [`update_metadata`](Self::update_metadata).
    pub fn set_metadata(&mut self, metadata: Metadata) -> RepoResult<()> {
        self.ensure_not_deleted()?;
        self.metadata = Some(metadata.rebase(self.uri.clone()));
        self.state = SyncState::Dirty;
        Ok(())
    }

    /// Write local edits back to the repository.
    ///
    /// Only the resource's own triples are sent. The repository's answer, in
    /// `read_mode` scope, replaces the local metadata. A handle without
    /// pending edits sends nothing.
    pub async fn update_metadata(&mut self, update_mode: UpdateMode, read_mode: MetadataMode) -> RepoResult<()> {
        self.ensure_not_deleted()?;
        if self.state != SyncState::Dirty {
            return Ok(());
        }
        let Some(metadata) = &self.metadata else {
            return Ok(());
        };

        let body = RdfSerializer::serialize(&metadata.root_triples(), RdfFormat::NTriples)?;
        let headers = self.repo.headers();
        let request = RepoRequest::new(Method::PATCH, self.metadata_url())
            .header(CONTENT_TYPE.as_str(), NTRIPLES_CONTENT_TYPE)
            .header(ACCEPT.as_str(), NTRIPLES_CONTENT_TYPE)
            .header(headers.metadata_write_mode.clone(), update_mode.as_str())
            .header(headers.metadata_read_mode.clone(), read_mode.as_str())
            .body(body);

        let response = self.repo.send_request(request).await?;
        self.replace_metadata(&response)?;
        debug!("Updated metadata of {} ({})", self.uri, update_mode);
        Ok(())
    }

    /// Fetch the binary content. The response body holds the bytes.
    pub async fn get_content(&self) -> RepoResult<RepoResponse> {
        self.ensure_not_deleted()?;
        let request = RepoRequest::new(Method::GET, self.uri.as_str());
        self.repo.send_request(request).await
    }

    /// Replace the binary content, then reload the metadata the repository
    /// derives from it (size, hash, MIME type)
    pub async fn update_content(&mut self, payload: BinaryPayload) -> RepoResult<()> {
        self.ensure_not_deleted()?;
        let request = payload.attach(RepoRequest::new(Method::PUT, self.uri.as_str()));
        self.repo.send_request(request).await?;
        debug!("Uploaded content of {}", self.uri);
        self.load_metadata(true, MetadataMode::Resource, None).await
    }

    /// Whether the resource carries binary content of non-zero size
    pub async fn has_binary_content(&mut self) -> RepoResult<bool> {
        let size_property = self.repo.schema().binary_size()?;
        let metadata = self.metadata().await?;
        Ok(metadata
            .get_literal(&size_property)
            .and_then(|l| l.as_f64())
            .is_some_and(|size| size > 0.0))
    }
}
