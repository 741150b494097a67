//! Read-only access to the repository schema
//!
//! The schema maps logical names (`id`, `parent`, `delete`, ...) to the
//! predicate URIs a particular repository uses. Structured entries are handed
//! out as deep copies so callers can never mutate the shared configuration.

use crate::error::{RepoError, RepoResult};
use crate::rdf::RdfPredicate;
use serde_json::Value;

/// Schema accessor over the `schema` section of [`RepoConfig`](crate::RepoConfig)
#[derive(Debug, Clone, Default)]
pub struct Schema {
    root: Value,
}

impl Schema {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in name.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        match current {
            Value::Null => None,
            value => Some(value),
        }
    }

    /// Value stored under `name`.
    ///
    /// `name` may be a dotted path into nested mappings (`search.match`).
    /// Every call returns a fresh copy; missing names return `None`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.lookup(name).cloned()
    }

    /// Scalar string stored under `name`
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.lookup(name).and_then(Value::as_str)
    }

    /// Predicate stored under `name`
    pub fn predicate(&self, name: &str) -> RepoResult<RdfPredicate> {
        let iri = self.get_str(name).ok_or_else(|| {
            RepoError::Configuration(format!("schema has no '{}' property", name))
        })?;
        RdfPredicate::new(iri).map_err(|e| {
            RepoError::Configuration(format!("schema property '{}': {}", name, e))
        })
    }

    /// Identifier property
    pub fn id(&self) -> RepoResult<RdfPredicate> {
        self.predicate("id")
    }

    /// Default parent property used for the relatives scope
    pub fn parent(&self) -> RepoResult<RdfPredicate> {
        self.predicate("parent")
    }

    /// Sentinel predicate marking a scrubbed reference
    pub fn delete(&self) -> RepoResult<RdfPredicate> {
        self.predicate("delete")
    }

    pub fn binary_size(&self) -> RepoResult<RdfPredicate> {
        self.predicate("binarySize")
    }

    pub fn hash(&self) -> RepoResult<RdfPredicate> {
        self.predicate("hash")
    }

    pub fn mime(&self) -> RepoResult<RdfPredicate> {
        self.predicate("mime")
    }

    pub fn file_name(&self) -> RepoResult<RdfPredicate> {
        self.predicate("fileName")
    }

    /// Marks a resource as a search match in search responses
    pub fn search_match(&self) -> RepoResult<RdfPredicate> {
        self.predicate("search.match")
    }

    /// Carries the total match count in search responses
    pub fn search_count(&self) -> RepoResult<RdfPredicate> {
        self.predicate("search.count")
    }

    /// Carries a match's position in search responses
    pub fn search_order(&self) -> RepoResult<RdfPredicate> {
        self.predicate("search.order")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(json!({
            "id": "https://vocab.example.org/hasIdentifier",
            "parent": "https://vocab.example.org/isPartOf",
            "ingest": { "skip": ["a", "b"] },
            "search": { "match": "search://match" },
            "broken": "not an iri",
        }))
    }

    #[test]
    fn test_structured_value_is_copied() {
        let schema = schema();
        let mut first = schema.get("ingest").unwrap();
        let second = schema.get("ingest").unwrap();
        assert_eq!(first, second);

        first["skip"] = json!([]);
        assert_ne!(first, second);
        assert_eq!(schema.get("ingest").unwrap(), second);
    }

    #[test]
    fn test_scalar_and_missing() {
        let schema = schema();
        assert_eq!(schema.get("id"), Some(json!("https://vocab.example.org/hasIdentifier")));
        assert_eq!(schema.get("nope"), None);
        assert_eq!(schema.get("search.nope"), None);
        assert_eq!(schema.get_str("search.match"), Some("search://match"));
    }

    #[test]
    fn test_typed_accessors() {
        let schema = schema();
        assert_eq!(schema.parent().unwrap().as_str(), "https://vocab.example.org/isPartOf");
        assert!(matches!(schema.delete(), Err(RepoError::Configuration(_))));
        assert!(matches!(schema.predicate("broken"), Err(RepoError::Configuration(_))));
    }
}
