//! RDF serialization formats
//!
//! Supports reading:
//! - N-Triples (the repository's wire format)
//! - Turtle
//! - RDF/XML
//!
//! and writing N-Triples and Turtle.

mod rio;

use super::graph::Graph;
use mime::Mime;
use oxiri::Iri;
use std::io::Cursor;
use thiserror::Error;

pub use self::rio::{NTriplesSerializer, TurtleSerializer};

/// Content type used for metadata written back to the repository
pub const NTRIPLES_CONTENT_TYPE: &str = "application/n-triples";

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// N-Triples format (.nt)
    NTriples,
    /// Turtle format (.ttl)
    Turtle,
    /// RDF/XML format (.rdf)
    RdfXml,
}

impl RdfFormat {
    /// Pick the format matching a `Content-Type` header value.
    ///
    /// Parameters such as `charset` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime: Mime = content_type.trim().parse().ok()?;
        match (mime.type_().as_str(), mime.subtype().as_str()) {
            ("application", "n-triples") | ("text", "plain") => Some(RdfFormat::NTriples),
            ("text", "turtle") | ("application", "x-turtle") => Some(RdfFormat::Turtle),
            ("application", "rdf+xml") => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            RdfFormat::NTriples => NTRIPLES_CONTENT_TYPE,
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::RdfXml => "application/rdf+xml",
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported content type
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0:?}")]
    UnsupportedFormat(RdfFormat),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse a document in the given format.
    ///
    /// `base_iri` resolves relative IRIs in Turtle and RDF/XML input.
    pub fn parse(input: &[u8], format: RdfFormat, base_iri: Option<&str>) -> ParseResult<Graph> {
        let base = match base_iri {
            Some(iri) => Some(
                Iri::parse(iri.to_string()).map_err(|e| ParseError::Parse(e.to_string()))?,
            ),
            None => None,
        };
        let reader = Cursor::new(input);
        match format {
            RdfFormat::NTriples => rio::parse_ntriples(reader),
            RdfFormat::Turtle => rio::parse_turtle(reader, base),
            RdfFormat::RdfXml => rio::parse_rdf_xml(reader, base),
        }
    }

    /// Parse a response body using its declared content type.
    ///
    /// A missing content type is read as N-Triples.
    pub fn parse_response(
        input: &[u8],
        content_type: Option<&str>,
        base_iri: Option<&str>,
    ) -> ParseResult<Graph> {
        let format = match content_type {
            None => RdfFormat::NTriples,
            Some(ct) => RdfFormat::from_content_type(ct)
                .ok_or_else(|| ParseError::UnsupportedContentType(ct.to_string()))?,
        };
        Self::parse(input, format, base_iri)
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize a graph to a string
    pub fn serialize(graph: &Graph, format: RdfFormat) -> SerializeResult<String> {
        match format {
            RdfFormat::NTriples => NTriplesSerializer::serialize(graph),
            RdfFormat::Turtle => TurtleSerializer::serialize(graph),
            RdfFormat::RdfXml => Err(SerializeError::UnsupportedFormat(format)),
        }
    }
}
