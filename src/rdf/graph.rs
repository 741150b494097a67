//! In-memory RDF graph
//!
//! An insertion-ordered set of triples with the lookups the resource layer
//! needs. Ordering is kept so that serialized metadata is deterministic.

use super::types::{NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};
use indexmap::IndexSet;

/// Iterator over triples
pub type TripleIterator<'a> = indexmap::set::Iter<'a, Triple>;

/// A set of RDF triples
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: IndexSet<Triple>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            triples: IndexSet::new(),
        }
    }

    /// Insert a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Remove a triple. Returns false if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        self.triples.shift_remove(triple)
    }

    /// Remove every triple matching the pattern, returning how many were removed
    pub fn remove_matching(&mut self, pattern: &TriplePattern) -> usize {
        let before = self.triples.len();
        self.triples.retain(|t| !pattern.matches(t));
        before - self.triples.len()
    }

    /// Check if a triple exists in the graph
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Get the total number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Clear all triples
    pub fn clear(&mut self) {
        self.triples.clear();
    }

    /// Get an iterator over all triples
    pub fn iter(&self) -> TripleIterator<'_> {
        self.triples.iter()
    }

    /// Query triples matching a pattern
    pub fn query(&self, pattern: &TriplePattern) -> Vec<Triple> {
        self.triples
            .iter()
            .filter(|triple| pattern.matches(triple))
            .cloned()
            .collect()
    }

    /// Get triples with a specific subject
    pub fn triples_with_subject<'a>(
        &'a self,
        subject: &'a RdfSubject,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| &t.subject == subject)
    }

    /// Objects of `subject` under `predicate`, in insertion order
    pub fn objects<'a>(
        &'a self,
        subject: &'a RdfSubject,
        predicate: &'a RdfPredicate,
    ) -> impl Iterator<Item = &'a RdfObject> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Distinct predicates used by `subject`, in first-seen order
    pub fn predicates(&self, subject: &RdfSubject) -> Vec<RdfPredicate> {
        self.triples_with_subject(subject)
            .map(|t| t.predicate.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct named subjects, in first-seen order
    pub fn named_subjects(&self) -> Vec<NamedNode> {
        self.triples
            .iter()
            .filter_map(|t| t.subject.as_named_node().cloned())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keep only the triples for which `keep` returns true
    pub fn retain(&mut self, keep: impl FnMut(&Triple) -> bool) {
        self.triples.retain(keep);
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = indexmap::set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = TripleIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
