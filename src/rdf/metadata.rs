//! Resource-rooted view over a graph

use super::graph::Graph;
use super::types::{Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};

/// Metadata of one repository resource.
///
/// Holds a graph together with the resource it is rooted at. Accessors work
/// on the root's triples; the rest of the graph (neighbors, relatives) is kept
/// as context and is reachable through [`Metadata::graph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    subject: NamedNode,
    graph: Graph,
}

impl Metadata {
    /// Empty metadata for `subject`
    pub fn new(subject: NamedNode) -> Self {
        Self {
            subject,
            graph: Graph::new(),
        }
    }

    /// Wrap an existing graph
    pub fn from_graph(subject: NamedNode, graph: Graph) -> Self {
        Self { subject, graph }
    }

    pub fn subject(&self) -> &NamedNode {
        &self.subject
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    fn root(&self) -> RdfSubject {
        RdfSubject::NamedNode(self.subject.clone())
    }

    /// Triples whose subject is the root resource
    pub fn root_triples(&self) -> Graph {
        let root = self.root();
        self.graph.triples_with_subject(&root).cloned().collect()
    }

    /// All values of `predicate` on the root resource
    pub fn get_all(&self, predicate: &RdfPredicate) -> Vec<&RdfObject> {
        let root = self.root();
        self.graph
            .iter()
            .filter(|t| t.subject == root && &t.predicate == predicate)
            .map(|t| &t.object)
            .collect()
    }

    /// First literal value of `predicate`
    pub fn get_literal(&self, predicate: &RdfPredicate) -> Option<&Literal> {
        self.get_all(predicate).into_iter().find_map(RdfObject::as_literal)
    }

    /// First IRI value of `predicate`
    pub fn get_resource(&self, predicate: &RdfPredicate) -> Option<&NamedNode> {
        self.get_all(predicate).into_iter().find_map(RdfObject::as_named_node)
    }

    /// Distinct predicates of the root resource
    pub fn predicates(&self) -> Vec<RdfPredicate> {
        self.graph.predicates(&self.root())
    }

    pub fn add(&mut self, predicate: RdfPredicate, object: RdfObject) -> bool {
        let triple = Triple::new(self.root(), predicate, object);
        self.graph.insert(triple)
    }

    pub fn add_resource(&mut self, predicate: RdfPredicate, object: NamedNode) -> bool {
        self.add(predicate, object.into())
    }

    pub fn add_literal(&mut self, predicate: RdfPredicate, object: Literal) -> bool {
        self.add(predicate, object.into())
    }

    /// Remove one value of `predicate`. Returns false if it was not present.
    pub fn delete_value(&mut self, predicate: &RdfPredicate, object: &RdfObject) -> bool {
        let triple = Triple::new(self.root(), predicate.clone(), object.clone());
        self.graph.remove(&triple)
    }

    /// Remove all values of `predicate`, returning how many were removed
    pub fn delete_all(&mut self, predicate: &RdfPredicate) -> usize {
        let pattern = TriplePattern::new(Some(self.root()), Some(predicate.clone()), None);
        self.graph.remove_matching(&pattern)
    }

    /// Move the root triples onto another subject.
    ///
    /// Context triples about other subjects are left untouched.
    pub fn rebase(self, subject: NamedNode) -> Self {
        if subject == self.subject {
            return self;
        }
        let old_root = self.root();
        let new_root = RdfSubject::NamedNode(subject.clone());
        let graph = self
            .graph
            .into_iter()
            .map(|mut t| {
                if t.subject == old_root {
                    t.subject = new_root.clone();
                }
                t
            })
            .collect();
        Self { subject, graph }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn pred(iri: &str) -> RdfPredicate {
        RdfPredicate::new(iri).unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut meta = Metadata::new(node("https://repo.example.org/api/1"));
        meta.add_literal(pred("https://vocab.example.org/title"), Literal::new_simple_literal("Report"));
        meta.add_resource(pred("https://vocab.example.org/partOf"), node("https://repo.example.org/api/2"));

        assert_eq!(
            meta.get_literal(&pred("https://vocab.example.org/title")).map(|l| l.value()),
            Some("Report")
        );
        assert_eq!(
            meta.get_resource(&pred("https://vocab.example.org/partOf")),
            Some(&node("https://repo.example.org/api/2"))
        );
        assert_eq!(meta.predicates().len(), 2);
    }

    #[test]
    fn test_delete_value_and_all() {
        let mut meta = Metadata::new(node("https://repo.example.org/api/1"));
        let rel = pred("https://vocab.example.org/relation");
        meta.add_resource(rel.clone(), node("https://repo.example.org/api/2"));
        meta.add_resource(rel.clone(), node("https://repo.example.org/api/3"));

        assert!(meta.delete_value(&rel, &node("https://repo.example.org/api/2").into()));
        assert!(!meta.delete_value(&rel, &node("https://repo.example.org/api/2").into()));
        assert_eq!(meta.get_all(&rel).len(), 1);
        assert_eq!(meta.delete_all(&rel), 1);
        assert!(meta.get_all(&rel).is_empty());
    }

    #[test]
    fn test_rebase_keeps_context() {
        let mut meta = Metadata::new(node("https://repo.example.org/api/1"));
        meta.add_literal(pred("https://vocab.example.org/title"), Literal::new_simple_literal("Report"));
        meta.graph_mut().insert(Triple::new(
            node("https://repo.example.org/api/9").into(),
            pred("https://vocab.example.org/title"),
            Literal::new_simple_literal("Context").into(),
        ));

        let moved = meta.rebase(node("https://repo.example.org/api/5"));
        assert_eq!(moved.subject().as_str(), "https://repo.example.org/api/5");
        assert_eq!(moved.root_triples().len(), 1);
        assert_eq!(moved.graph().len(), 2);
    }
}
