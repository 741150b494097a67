//! RDF model and codecs for repository metadata
//!
//! - RDF terms and triples (wrapping oxrdf)
//! - An insertion-ordered [`Graph`]
//! - [`Metadata`], a graph rooted at one repository resource
//! - Parsing (N-Triples, Turtle, RDF/XML) and writing (N-Triples, Turtle)
//!
//! # Example
//!
//! ```rust
//! use rdfrepo::rdf::{Metadata, NamedNode, Literal, RdfPredicate, RdfSerializer, RdfFormat};
//!
//! let subject = NamedNode::new("https://repo.example.org/api/1").unwrap();
//! let title = RdfPredicate::new("https://vocab.example.org/title").unwrap();
//!
//! let mut meta = Metadata::new(subject);
//! meta.add_literal(title, Literal::new_simple_literal("Report"));
//!
//! let nt = RdfSerializer::serialize(meta.graph(), RdfFormat::NTriples).unwrap();
//! assert!(nt.contains("\"Report\""));
//! ```

mod graph;
mod metadata;
mod serialization;
mod types;

pub use types::{
    xsd, BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult,
    RdfSubject, Triple, TriplePattern,
};

pub use graph::{Graph, TripleIterator};

pub use metadata::Metadata;

pub use serialization::{
    NTriplesSerializer, ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer,
    SerializeError, SerializeResult, TurtleSerializer, NTRIPLES_CONTENT_TYPE,
};
