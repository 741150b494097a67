//! Deletion with reference cleanup and recursive deletion
//!
//! Both loops page through a server-side query with the offset pinned at
//! zero: every processed row drops out of the match set, so the next page
//! starts where the previous one ended. A page made only of rows that were
//! already processed means the repository did not drop them, and the loop
//! stops with [`RepoError::CleanupStalled`].

use super::{RepoResource, SyncState};
use crate::error::{RepoError, RepoResult};
use crate::mode::{MetadataMode, UpdateMode};
use crate::rdf::{NamedNode, RdfObject, RdfPredicate};
use crate::search::{ResourceSequence, SearchConfig};
use crate::transport::RepoRequest;
use reqwest::Method;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Resources holding a relation to the given internal id
pub const REFERENCES_QUERY: &str = "SELECT id FROM relations WHERE target_id = ? ORDER BY id";

/// Transitive closure over a property from the given internal id, deepest
/// resources first
pub const RELATIVES_QUERY: &str = "SELECT id FROM get_relatives(?, ?) ORDER BY depth DESC, id";

/// Page size of the cleanup and recursive-delete loops
pub const CLEANUP_BATCH_SIZE: u64 = 1000;

fn first_page() -> SearchConfig {
    SearchConfig {
        metadata_mode: Some(MetadataMode::Resource),
        limit: Some(CLEANUP_BATCH_SIZE),
        offset: Some(0),
        ..Default::default()
    }
}

impl RepoResource {
    /// Delete the resource.
    ///
    /// With `tombstone` the deletion record is purged as well. With
    /// `cleanup_references` every relation other resources hold to this one
    /// is removed afterwards; a predicate left without values is replaced by
    /// the schema's delete marker. Failures abort immediately and leave the
    /// repository as it was at that point.
    pub async fn delete(&mut self, tombstone: bool, cleanup_references: bool) -> RepoResult<()> {
        self.ensure_not_deleted()?;
        // resolved before anything is removed on the server
        let id = if cleanup_references {
            Some(self.internal_id()?)
        } else {
            None
        };

        self.repo
            .send_request(RepoRequest::new(Method::DELETE, self.uri.as_str()))
            .await?;
        if tombstone {
            let url = format!("{}/tombstone", self.uri.as_str());
            self.repo.send_request(RepoRequest::new(Method::DELETE, url)).await?;
        }
        if let Some(id) = id {
            let cleaned = self.cleanup_references(id).await?;
            debug!("Removed references to {} from {} resources", self.uri, cleaned);
        }

        self.metadata = None;
        self.state = SyncState::Deleted;
        info!("Deleted resource {}", self.uri);
        Ok(())
    }

    async fn cleanup_references(&self, id: u64) -> RepoResult<usize> {
        let marker = self.repo.schema().delete()?;
        let target = RdfObject::NamedNode(self.uri.clone());
        let params = [id.to_string()];
        let mut processed = HashSet::new();

        loop {
            let page = self.reference_page(&params).await?;
            if page.is_empty() {
                return Ok(processed.len());
            }
            debug!("Reference cleanup of {}: {} resources in page", self.uri, page.remaining());

            let mut progressed = false;
            for mut referrer in page {
                if !processed.insert(referrer.uri.clone()) {
                    continue;
                }
                progressed = true;
                referrer.scrub(&target, &marker).await?;
            }
            if !progressed {
                warn!("Reference cleanup of {} made no progress", self.uri);
                return Err(RepoError::CleanupStalled(self.uri.as_str().to_string()));
            }
        }
    }

    async fn reference_page(&self, params: &[String]) -> RepoResult<ResourceSequence> {
        let mut config = first_page();
        self.repo
            .get_resources_by_sql_query(REFERENCES_QUERY, params, &mut config)
            .await
    }

    /// Remove every value pointing at `target` and write the result back
    async fn scrub(&mut self, target: &RdfObject, marker: &RdfPredicate) -> RepoResult<()> {
        self.load_metadata(false, MetadataMode::Resource, None).await?;
        let id_property = self.repo.schema().id().ok();
        let Some(metadata) = self.metadata.as_mut() else {
            return Ok(());
        };

        let mut changed = false;
        for predicate in metadata.predicates() {
            // identifiers are not references
            if id_property.as_ref() == Some(&predicate) {
                continue;
            }
            if !metadata.delete_value(&predicate, target) {
                continue;
            }
            changed = true;
            if metadata.get_all(&predicate).is_empty() {
                metadata.add_resource(marker.clone(), predicate.as_named_node().clone());
            }
        }
        if changed {
            self.state = SyncState::Dirty;
        }
        self.update_metadata(UpdateMode::Merge, MetadataMode::Resource).await
    }

    /// Delete the resource and everything connected to it through
    /// `via_property`, in either direction, deepest first.
    ///
    /// Each resource is removed with [`delete`](Self::delete) using the given
    /// flags. The cascade is not atomic: a failure stops it and resources
    /// deleted so far stay deleted.
    pub async fn delete_recursively(
        &mut self,
        via_property: &str,
        tombstone: bool,
        cleanup_references: bool,
    ) -> RepoResult<()> {
        self.ensure_not_deleted()?;
        let params = [self.internal_id()?.to_string(), via_property.to_string()];
        let mut processed = HashSet::new();

        loop {
            let mut page = self.relatives_page(&params, 0).await?;
            if page.is_empty() {
                break;
            }
            let more = page.total_count() > page.remaining() as u64
                || page.remaining() as u64 >= CLEANUP_BATCH_SIZE;
            debug!("Recursive delete of {}: {} resources in page", self.uri, page.remaining());

            let mut progressed = false;
            while let Some(mut relative) = page.next() {
                if !processed.insert(relative.uri.clone()) {
                    continue;
                }
                progressed = true;
                if relative.uri != self.uri {
                    relative.delete(tombstone, cleanup_references).await?;
                    continue;
                }

                // the closure is rooted here, so whatever follows must be
                // known before this resource disappears
                let rest: Vec<RepoResource> = if more {
                    self.closure_after_self(&params, &mut processed).await?
                } else {
                    page.by_ref()
                        .filter(|r| processed.insert(r.uri.clone()))
                        .collect()
                };
                self.delete(tombstone, cleanup_references).await?;
                for mut relative in rest {
                    relative.delete(tombstone, cleanup_references).await?;
                }
                info!("Deleted {} together with its relatives over {}", self.uri, via_property);
                return Ok(());
            }
            if !progressed {
                warn!("Recursive delete of {} made no progress", self.uri);
                return Err(RepoError::CleanupStalled(self.uri.as_str().to_string()));
            }
        }

        if !self.is_deleted() {
            self.delete(tombstone, cleanup_references).await?;
        }
        info!("Deleted {} together with its relatives over {}", self.uri, via_property);
        Ok(())
    }

    async fn relatives_page(&self, params: &[String], offset: u64) -> RepoResult<ResourceSequence> {
        let mut config = SearchConfig {
            offset: Some(offset),
            ..first_page()
        };
        self.repo
            .get_resources_by_sql_query(RELATIVES_QUERY, params, &mut config)
            .await
    }

    /// Unprocessed part of the closure, read in full while nothing is being
    /// deleted. The match set is stable here, so the offset advances.
    async fn closure_after_self(
        &self,
        params: &[String],
        processed: &mut HashSet<NamedNode>,
    ) -> RepoResult<Vec<RepoResource>> {
        let mut rest = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.relatives_page(params, offset).await?;
            let size = page.remaining() as u64;
            let before = rest.len();
            rest.extend(page.filter(|r| r.uri != self.uri && processed.insert(r.uri.clone())));
            if size < CLEANUP_BATCH_SIZE {
                return Ok(rest);
            }
            if rest.len() == before {
                warn!("Recursive delete of {} made no progress", self.uri);
                return Err(RepoError::CleanupStalled(self.uri.as_str().to_string()));
            }
            offset += CLEANUP_BATCH_SIZE;
        }
    }
}
