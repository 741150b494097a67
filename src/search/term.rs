//! Single predicate filter of a repository search

use crate::rdf::RdfObject;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RepoError;

/// Comparison applied between a stored value and the term's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    /// Regular expression match
    Regex,
    /// Full-text match
    Fts,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Regex => "~",
            Operator::Fts => "@@",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Neq => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Regex | Operator::Fts => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Neq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "~" => Ok(Operator::Regex),
            "@@" => Ok(Operator::Fts),
            other => Err(RepoError::Configuration(format!("unknown operator '{}'", other))),
        }
    }
}

/// How a term's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Relation,
    Number,
    Date,
    DateTime,
    String,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Relation => "relation",
            ValueType::Number => "number",
            ValueType::Date => "date",
            ValueType::DateTime => "datetime",
            ValueType::String => "string",
        }
    }

    /// Guess the type of an untyped value
    pub fn infer(value: &str) -> Self {
        if value.trim().parse::<f64>().is_ok() {
            ValueType::Number
        } else if parse_datetime(value).is_some() && value.contains('T') {
            ValueType::DateTime
        } else if parse_date(value).is_some() {
            ValueType::Date
        } else {
            ValueType::String
        }
    }
}

impl FromStr for ValueType {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relation" => Ok(ValueType::Relation),
            "number" => Ok(ValueType::Number),
            "date" => Ok(ValueType::Date),
            "datetime" => Ok(ValueType::DateTime),
            "string" => Ok(ValueType::String),
            other => Err(RepoError::Configuration(format!("unknown value type '{}'", other))),
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(value).map(|dt| dt.date()))
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok())
}

/// One filter of a conjunctive search.
///
/// Several `values` are alternatives: the term matches when any of them does.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchTerm {
    /// Predicate URI; `None` matches any predicate
    pub property: Option<String>,
    pub operator: Operator,
    pub values: Vec<String>,
    /// Explicit value type; inferred from the first value when absent
    pub value_type: Option<ValueType>,
    pub language: Option<String>,
}

impl SearchTerm {
    /// `property = value`
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            values: vec![value.into()],
            ..Default::default()
        }
    }

    /// `property` equal to any of `values`
    pub fn any_of<I, S>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            property: Some(property.into()),
            values: values.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn effective_type(&self) -> ValueType {
        self.value_type.unwrap_or_else(|| {
            self.values
                .first()
                .map(|v| ValueType::infer(v))
                .unwrap_or(ValueType::String)
        })
    }

    /// Form fields of the term at position `n` of a search request
    pub fn to_form_data(&self, n: usize) -> Vec<(String, String)> {
        let mut data = Vec::new();
        if let Some(property) = &self.property {
            data.push((format!("property[{}]", n), property.clone()));
        }
        data.push((format!("operator[{}]", n), self.operator.as_str().to_string()));
        for value in &self.values {
            data.push((format!("value[{}][]", n), value.clone()));
        }
        if let Some(value_type) = &self.value_type {
            data.push((format!("type[{}]", n), value_type.as_str().to_string()));
        }
        if let Some(language) = &self.language {
            data.push((format!("language[{}]", n), language.clone()));
        }
        data
    }

    /// Rebuild the terms of a search request from its form fields.
    ///
    /// Fields that do not belong to a term are ignored.
    pub fn from_form_data(pairs: &[(String, String)]) -> Result<Vec<SearchTerm>, RepoError> {
        let mut terms: BTreeMap<usize, SearchTerm> = BTreeMap::new();
        for (key, value) in pairs {
            let Some((name, n)) = indexed_key(key) else {
                continue;
            };
            if !matches!(name, "property" | "operator" | "value" | "type" | "language") {
                continue;
            }
            let term = terms.entry(n).or_default();
            match name {
                "property" => term.property = Some(value.clone()),
                "operator" => term.operator = value.parse()?,
                "value" => term.values.push(value.clone()),
                "type" => term.value_type = Some(value.parse()?),
                _ => term.language = Some(value.clone()),
            }
        }
        Ok(terms.into_values().collect())
    }

    /// Check a stored value against the term
    pub fn matches_value(&self, object: &RdfObject) -> bool {
        let value_type = self.effective_type();
        self.values
            .iter()
            .any(|value| self.matches_one(object, value, value_type))
    }

    fn matches_one(&self, object: &RdfObject, value: &str, value_type: ValueType) -> bool {
        match self.operator {
            Operator::Regex => {
                return Regex::new(value)
                    .map(|re| re.is_match(object.lexical()))
                    .unwrap_or(false)
                    && self.language_matches(object);
            }
            Operator::Fts => {
                return object
                    .lexical()
                    .to_lowercase()
                    .contains(&value.to_lowercase())
                    && self.language_matches(object);
            }
            _ => {}
        }

        let ordering = match value_type {
            ValueType::Relation => {
                let Some(node) = object.as_named_node() else {
                    return false;
                };
                node.as_str().cmp(value)
            }
            ValueType::Number => {
                let (Some(stored), Ok(wanted)) = (
                    object.as_literal().and_then(|l| l.as_f64()),
                    value.trim().parse::<f64>(),
                ) else {
                    return false;
                };
                match stored.partial_cmp(&wanted) {
                    Some(ordering) => ordering,
                    None => return false,
                }
            }
            ValueType::Date => {
                let (Some(stored), Some(wanted)) = (parse_date(object.lexical()), parse_date(value))
                else {
                    return false;
                };
                stored.cmp(&wanted)
            }
            ValueType::DateTime => {
                let (Some(stored), Some(wanted)) = (
                    parse_datetime(object.lexical()).or_else(|| midnight(object.lexical())),
                    parse_datetime(value).or_else(|| midnight(value)),
                ) else {
                    return false;
                };
                stored.cmp(&wanted)
            }
            ValueType::String => {
                if !object.is_literal() || !self.language_matches(object) {
                    return false;
                }
                object.lexical().cmp(value)
            }
        };
        self.operator.accepts(ordering)
    }

    fn language_matches(&self, object: &RdfObject) -> bool {
        match &self.language {
            None => true,
            Some(language) => object
                .as_literal()
                .and_then(|l| l.language())
                .is_some_and(|l| l.eq_ignore_ascii_case(language)),
        }
    }
}

fn midnight(value: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Split `name[3]` or `name[3][]` into `("name", 3)`
fn indexed_key(key: &str) -> Option<(&str, usize)> {
    let (name, rest) = key.split_once('[')?;
    let (index, _) = rest.split_once(']')?;
    Some((name, index.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, NamedNode};

    fn lit(value: &str) -> RdfObject {
        Literal::new_simple_literal(value).into()
    }

    #[test]
    fn test_type_inference() {
        assert_eq!(ValueType::infer("42"), ValueType::Number);
        assert_eq!(ValueType::infer("2024-03-01"), ValueType::Date);
        assert_eq!(ValueType::infer("2024-03-01T10:00:00Z"), ValueType::DateTime);
        assert_eq!(ValueType::infer("report"), ValueType::String);
    }

    #[test]
    fn test_form_data_round_trip() {
        let terms = vec![
            SearchTerm::new("https://vocab.example.org/title", "Report").with_language("en"),
            SearchTerm::any_of("https://vocab.example.org/id", ["doi:10.5/x", "id:legacy-7"])
                .with_type(ValueType::Relation),
            SearchTerm::new("https://vocab.example.org/size", "10").with_operator(Operator::Ge),
        ];
        let pairs: Vec<_> = terms
            .iter()
            .enumerate()
            .flat_map(|(n, t)| t.to_form_data(n))
            .chain([("limit".to_string(), "5".to_string())])
            .collect();
        assert!(pairs.contains(&("value[1][]".to_string(), "id:legacy-7".to_string())));
        assert_eq!(SearchTerm::from_form_data(&pairs).unwrap(), terms);
    }

    #[test]
    fn test_form_data_with_sparse_indices() {
        let pairs = vec![
            ("property[4000000000]".to_string(), "https://vocab.example.org/title".to_string()),
            ("value[4000000000][]".to_string(), "Report".to_string()),
            (format!("property[{}]", usize::MAX), "https://vocab.example.org/size".to_string()),
        ];
        let terms = SearchTerm::from_form_data(&pairs).unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0], SearchTerm::new("https://vocab.example.org/title", "Report"));
        assert_eq!(terms[1].property.as_deref(), Some("https://vocab.example.org/size"));
        assert!(terms[1].values.is_empty());
    }

    #[test]
    fn test_number_and_date_comparisons() {
        let size = SearchTerm::new("p", "10").with_operator(Operator::Gt);
        assert!(size.matches_value(&Literal::integer(11).into()));
        assert!(!size.matches_value(&Literal::integer(10).into()));
        assert!(!size.matches_value(&lit("big")));

        let since = SearchTerm::new("p", "2024-01-01").with_operator(Operator::Ge);
        assert!(since.matches_value(&lit("2024-06-30")));
        assert!(since.matches_value(&lit("2024-01-01T08:00:00Z")));
        assert!(!since.matches_value(&lit("2023-12-31")));
    }

    #[test]
    fn test_relation_and_string() {
        let target = NamedNode::new("https://repo.example.org/api/4").unwrap();
        let rel = SearchTerm::new("p", "https://repo.example.org/api/4").with_type(ValueType::Relation);
        assert!(rel.matches_value(&target.clone().into()));
        assert!(!rel.matches_value(&lit("https://repo.example.org/api/4")));

        let title = SearchTerm::new("p", "Report").with_language("en");
        assert!(title.matches_value(&Literal::new_language_tagged_literal("Report", "en").unwrap().into()));
        assert!(!title.matches_value(&lit("Report")));
        assert!(!title.matches_value(&target.into()));
    }

    #[test]
    fn test_regex_and_fts() {
        let re = SearchTerm::new("p", "^Rep.*t$").with_operator(Operator::Regex);
        assert!(re.matches_value(&lit("Report")));
        let bad = SearchTerm::new("p", "(").with_operator(Operator::Regex);
        assert!(!bad.matches_value(&lit("(")));

        let fts = SearchTerm::new("p", "annual").with_operator(Operator::Fts);
        assert!(fts.matches_value(&lit("The Annual Report")));
    }
}
