//! Conversions between rio's borrowed model and the owned RDF types

use super::{ParseError, ParseResult, SerializeError, SerializeResult};
use crate::rdf::graph::Graph;
use crate::rdf::types::{
    xsd, BlankNode, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple,
};
use oxiri::Iri;
use rio_api::formatter::TriplesFormatter;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleError, TurtleFormatter, TurtleParser};
use rio_xml::{RdfXmlError, RdfXmlParser};
use std::io::BufRead;

impl From<TurtleError> for ParseError {
    fn from(e: TurtleError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

impl From<RdfXmlError> for ParseError {
    fn from(e: RdfXmlError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

pub(super) fn parse_ntriples(reader: impl BufRead) -> ParseResult<Graph> {
    collect(NTriplesParser::new(reader))
}

pub(super) fn parse_turtle(reader: impl BufRead, base: Option<Iri<String>>) -> ParseResult<Graph> {
    collect(TurtleParser::new(reader, base))
}

pub(super) fn parse_rdf_xml(reader: impl BufRead, base: Option<Iri<String>>) -> ParseResult<Graph> {
    collect(RdfXmlParser::new(reader, base))
}

fn collect<P>(mut parser: P) -> ParseResult<Graph>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let mut graph = Graph::new();
    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        graph.insert(Triple::new(
            convert_subject(t.subject)?,
            convert_predicate(t.predicate)?,
            convert_object(t.object)?,
        ));
        Ok(())
    })?;
    Ok(graph)
}

/// N-Triples serializer
pub struct NTriplesSerializer;

impl NTriplesSerializer {
    /// Serialize a graph to an N-Triples string
    pub fn serialize(graph: &Graph) -> SerializeResult<String> {
        let mut formatter = NTriplesFormatter::new(Vec::new());
        for triple in graph {
            formatter
                .format(&rio_triple(triple))
                .map_err(|e| SerializeError::Serialize(e.to_string()))?;
        }
        let output = formatter.finish()?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

/// Turtle serializer
pub struct TurtleSerializer;

impl TurtleSerializer {
    /// Serialize a graph to a Turtle string
    pub fn serialize(graph: &Graph) -> SerializeResult<String> {
        let mut formatter = TurtleFormatter::new(Vec::new());
        for triple in graph {
            formatter
                .format(&rio_triple(triple))
                .map_err(|e| SerializeError::Serialize(e.to_string()))?;
        }
        let output = formatter.finish()?;
        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

fn rio_triple(triple: &Triple) -> model::Triple<'_> {
    let subject = match &triple.subject {
        RdfSubject::NamedNode(n) => model::Subject::NamedNode(model::NamedNode { iri: n.as_str() }),
        RdfSubject::BlankNode(b) => model::Subject::BlankNode(model::BlankNode { id: b.as_str() }),
    };
    let predicate = model::NamedNode {
        iri: triple.predicate.as_str(),
    };
    let object = match &triple.object {
        RdfObject::NamedNode(n) => model::Term::NamedNode(model::NamedNode { iri: n.as_str() }),
        RdfObject::BlankNode(b) => model::Term::BlankNode(model::BlankNode { id: b.as_str() }),
        RdfObject::Literal(l) => model::Term::Literal(rio_literal(l)),
    };
    model::Triple {
        subject,
        predicate,
        object,
    }
}

fn rio_literal(literal: &Literal) -> model::Literal<'_> {
    if let Some(language) = literal.language() {
        return model::Literal::LanguageTaggedString {
            value: literal.value(),
            language,
        };
    }
    let datatype = literal.datatype_iri();
    if datatype == xsd::STRING {
        model::Literal::Simple {
            value: literal.value(),
        }
    } else {
        model::Literal::Typed {
            value: literal.value(),
            datatype: model::NamedNode { iri: datatype },
        }
    }
}

fn named_node(iri: &str) -> ParseResult<NamedNode> {
    NamedNode::new(iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_subject(s: model::Subject<'_>) -> ParseResult<RdfSubject> {
    match s {
        model::Subject::NamedNode(n) => Ok(RdfSubject::NamedNode(named_node(n.iri)?)),
        model::Subject::BlankNode(b) => Ok(RdfSubject::BlankNode(
            BlankNode::from_id(b.id).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        _ => Err(ParseError::Parse("Quoted triples are not supported".to_string())),
    }
}

fn convert_predicate(p: model::NamedNode<'_>) -> ParseResult<RdfPredicate> {
    Ok(RdfPredicate::from(named_node(p.iri)?))
}

fn convert_object(o: model::Term<'_>) -> ParseResult<RdfObject> {
    match o {
        model::Term::NamedNode(n) => Ok(RdfObject::NamedNode(named_node(n.iri)?)),
        model::Term::BlankNode(b) => Ok(RdfObject::BlankNode(
            BlankNode::from_id(b.id).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        model::Term::Literal(l) => match l {
            model::Literal::Simple { value } => {
                Ok(RdfObject::Literal(Literal::new_simple_literal(value)))
            }
            model::Literal::LanguageTaggedString { value, language } => Ok(RdfObject::Literal(
                Literal::new_language_tagged_literal(value, language)
                    .map_err(|e| ParseError::Parse(e.to_string()))?,
            )),
            model::Literal::Typed { value, datatype } => Ok(RdfObject::Literal(
                Literal::new_typed_literal(value, named_node(datatype.iri)?),
            )),
        },
        _ => Err(ParseError::Parse("Quoted triples are not supported".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::serialization::{RdfFormat, RdfParser};

    #[test]
    fn test_ntriples_output_is_parseable() {
        let input = br#"<https://repo.example.org/api/1> <https://vocab.example.org/title> "Report"@en .
<https://repo.example.org/api/1> <https://vocab.example.org/size> "12"^^<http://www.w3.org/2001/XMLSchema#integer> .
<https://repo.example.org/api/1> <https://vocab.example.org/partOf> <https://repo.example.org/api/2> .
"#;
        let graph = RdfParser::parse(input, RdfFormat::NTriples, None).unwrap();
        assert_eq!(graph.len(), 3);

        let output = NTriplesSerializer::serialize(&graph).unwrap();
        assert!(output.contains("\"Report\"@en"));
        assert!(output.contains("^^<http://www.w3.org/2001/XMLSchema#integer>"));

        let reparsed = RdfParser::parse(output.as_bytes(), RdfFormat::NTriples, None).unwrap();
        assert_eq!(reparsed, graph);
    }

    #[test]
    fn test_escaped_literal_survives() {
        let mut graph = Graph::new();
        graph.insert(Triple::new(
            NamedNode::new("https://repo.example.org/api/1").unwrap().into(),
            RdfPredicate::new("https://vocab.example.org/title").unwrap(),
            Literal::new_simple_literal("line \"one\"\nline two").into(),
        ));
        let output = NTriplesSerializer::serialize(&graph).unwrap();
        let reparsed = RdfParser::parse(output.as_bytes(), RdfFormat::NTriples, None).unwrap();
        assert_eq!(reparsed, graph);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let result = RdfParser::parse(b"<https://a> <https://b> .", RdfFormat::NTriples, None);
        assert!(matches!(result, Err(ParseError::Parse(_))));
    }
}
