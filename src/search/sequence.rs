//! Resources produced by a search

use crate::error::RepoResult;
use crate::mode::MetadataMode;
use crate::rdf::{Graph, Metadata, NamedNode, RdfSubject};
use crate::repo::Repo;
use crate::resource::RepoResource;

/// Finite, single-pass sequence of resource handles from one search response.
///
/// Handles are built on demand from the response graph and come back with
/// their metadata already loaded. Further pages require a new search call.
#[derive(Debug)]
pub struct ResourceSequence {
    repo: Repo,
    graph: Graph,
    matches: std::vec::IntoIter<NamedNode>,
    mode: MetadataMode,
    count: u64,
}

impl ResourceSequence {
    /// Split a search response into matches and their metadata.
    ///
    /// Matches are the subjects flagged with the schema's search-match
    /// predicate, ordered by their search-order value. The search bookkeeping
    /// triples are stripped from the metadata handed to the resources.
    pub(crate) fn from_response(repo: Repo, mut graph: Graph, mode: MetadataMode) -> RepoResult<Self> {
        let schema = repo.schema();
        let match_predicate = schema.search_match()?;
        let order_predicate = schema.search_order()?;
        let count_predicate = schema.search_count()?;

        let mut ranked: Vec<(Option<i64>, usize, NamedNode)> = Vec::new();
        for triple in graph.iter().filter(|t| t.predicate == match_predicate) {
            let Some(node) = triple.subject.as_named_node() else {
                continue;
            };
            if ranked.iter().any(|(_, _, n)| n == node) {
                continue;
            }
            let position = graph
                .objects(&triple.subject, &order_predicate)
                .find_map(|o| o.as_literal())
                .and_then(|l| l.value().trim().parse::<i64>().ok());
            ranked.push((position, ranked.len(), node.clone()));
        }
        // unranked matches keep response order after the ranked ones
        ranked.sort_by_key(|(position, seen, _)| (position.is_none(), *position, *seen));

        let base = RdfSubject::NamedNode(NamedNode::new(repo.base_url())?);
        let count = graph
            .objects(&base, &count_predicate)
            .find_map(|o| o.as_literal())
            .and_then(|l| l.value().trim().parse::<u64>().ok())
            .unwrap_or(ranked.len() as u64);

        graph.retain(|t| {
            t.predicate != match_predicate
                && t.predicate != order_predicate
                && t.predicate != count_predicate
        });

        let matches: Vec<NamedNode> = ranked.into_iter().map(|(_, _, node)| node).collect();
        Ok(Self {
            repo,
            graph,
            matches: matches.into_iter(),
            mode,
            count,
        })
    }

    /// Total number of matches reported by the repository
    pub fn total_count(&self) -> u64 {
        self.count
    }

    /// Number of handles left in this page
    pub fn remaining(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.len() == 0
    }
}

impl Iterator for ResourceSequence {
    type Item = RepoResource;

    fn next(&mut self) -> Option<Self::Item> {
        let uri = self.matches.next()?;
        let graph = match self.mode {
            MetadataMode::Resource => {
                let root = RdfSubject::NamedNode(uri.clone());
                self.graph.triples_with_subject(&root).cloned().collect()
            }
            MetadataMode::Neighbors | MetadataMode::Relatives => self.graph.clone(),
        };
        Some(RepoResource::from_metadata(
            self.repo.clone(),
            Metadata::from_graph(uri, graph),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.matches.size_hint()
    }
}

impl ExactSizeIterator for ResourceSequence {}
