//! Search request configuration

use crate::config::HeaderNames;
use crate::mode::MetadataMode;

/// Pagination, scope, ordering and full-text options of a search.
///
/// Everything except the metadata scope travels in the request body (see
/// [`SearchConfig::to_query`]); the scope travels in headers (see
/// [`SearchConfig::headers`]). `count` is filled in by the search call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchConfig {
    pub metadata_mode: Option<MetadataMode>,
    /// Parent property used to expand [`MetadataMode::Relatives`]
    pub metadata_parent_property: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Predicates to order by; a leading `^` sorts descending
    pub order_by: Vec<String>,
    pub order_by_lang: Option<String>,
    pub fts_query: Option<String>,
    pub fts_property: Option<String>,
    pub fts_start_sel: Option<String>,
    pub fts_stop_sel: Option<String>,
    pub fts_max_words: Option<u32>,
    pub fts_min_words: Option<u32>,
    pub fts_short_word: Option<u32>,
    pub fts_max_fragments: Option<u32>,
    pub fts_fragment_delimiter: Option<String>,
    /// Restrict the predicates returned for matched resources
    pub resource_properties: Vec<String>,
    /// Restrict the predicates returned for related resources
    pub relatives_properties: Vec<String>,
    /// Total number of matches, regardless of `limit`/`offset`
    pub count: Option<u64>,
}

fn push_opt<T: ToString>(query: &mut Vec<(String, String)>, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        let value = value.to_string();
        if !value.is_empty() {
            query.push((key.to_string(), value));
        }
    }
}

fn push_list(query: &mut Vec<(String, String)>, key: &str, values: &[String]) {
    for value in values.iter().filter(|v| !v.is_empty()) {
        query.push((format!("{}[]", key), value.clone()));
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat key-value form of every non-empty request parameter.
    ///
    /// The metadata scope and the `count` output are never included.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_opt(&mut query, "limit", &self.limit);
        push_opt(&mut query, "offset", &self.offset);
        push_list(&mut query, "orderBy", &self.order_by);
        push_opt(&mut query, "orderByLang", &self.order_by_lang);
        push_opt(&mut query, "ftsQuery", &self.fts_query);
        push_opt(&mut query, "ftsProperty", &self.fts_property);
        push_opt(&mut query, "ftsStartSel", &self.fts_start_sel);
        push_opt(&mut query, "ftsStopSel", &self.fts_stop_sel);
        push_opt(&mut query, "ftsMaxWords", &self.fts_max_words);
        push_opt(&mut query, "ftsMinWords", &self.fts_min_words);
        push_opt(&mut query, "ftsShortWord", &self.fts_short_word);
        push_opt(&mut query, "ftsMaxFragments", &self.fts_max_fragments);
        push_opt(&mut query, "ftsFragmentDelimiter", &self.fts_fragment_delimiter);
        push_list(&mut query, "resourceProperties", &self.resource_properties);
        push_list(&mut query, "relativesProperties", &self.relatives_properties);
        query
    }

    /// [`to_query`](Self::to_query) as a URL-encoded string
    pub fn to_query_string(&self) -> String {
        super::form::encode(&self.to_query())
    }

    /// Read the request parameters back from form fields.
    ///
    /// Unknown keys and unparsable numbers are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut config = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "limit" => config.limit = value.parse().ok(),
                "offset" => config.offset = value.parse().ok(),
                "orderBy[]" => config.order_by.push(value.clone()),
                "orderByLang" => config.order_by_lang = Some(value.clone()),
                "ftsQuery" => config.fts_query = Some(value.clone()),
                "ftsProperty" => config.fts_property = Some(value.clone()),
                "ftsStartSel" => config.fts_start_sel = Some(value.clone()),
                "ftsStopSel" => config.fts_stop_sel = Some(value.clone()),
                "ftsMaxWords" => config.fts_max_words = value.parse().ok(),
                "ftsMinWords" => config.fts_min_words = value.parse().ok(),
                "ftsShortWord" => config.fts_short_word = value.parse().ok(),
                "ftsMaxFragments" => config.fts_max_fragments = value.parse().ok(),
                "ftsFragmentDelimiter" => config.fts_fragment_delimiter = Some(value.clone()),
                "resourceProperties[]" => config.resource_properties.push(value.clone()),
                "relativesProperties[]" => config.relatives_properties.push(value.clone()),
                _ => {}
            }
        }
        config
    }

    /// Scope-control headers; unset values produce no header
    pub fn headers(&self, names: &HeaderNames) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(mode) = self.metadata_mode {
            headers.push((names.metadata_read_mode.clone(), mode.as_str().to_string()));
        }
        if let Some(parent) = self.metadata_parent_property.as_ref().filter(|p| !p.is_empty()) {
            headers.push((names.metadata_parent_property.clone(), parent.clone()));
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_skips_scope_and_empty_fields() {
        let config = SearchConfig {
            metadata_mode: Some(MetadataMode::Relatives),
            metadata_parent_property: Some("https://vocab.example.org/isPartOf".to_string()),
            fts_query: Some(String::new()),
            count: Some(12),
            ..Default::default()
        };
        assert!(config.to_query().is_empty());
    }

    #[test]
    fn test_query_fields() {
        let config = SearchConfig {
            limit: Some(10),
            offset: Some(0),
            order_by: vec!["^https://vocab.example.org/date".to_string()],
            fts_query: Some("annual".to_string()),
            fts_max_fragments: Some(3),
            ..Default::default()
        };
        let query = config.to_query();
        assert_eq!(
            query,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("orderBy[]".to_string(), "^https://vocab.example.org/date".to_string()),
                ("ftsQuery".to_string(), "annual".to_string()),
                ("ftsMaxFragments".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(SearchConfig::from_pairs(&query), config);
        assert!(config.to_query_string().starts_with("limit=10&offset=0&orderBy%5B%5D="));
    }

    #[test]
    fn test_headers() {
        let names = HeaderNames::default();
        assert!(SearchConfig::default().headers(&names).is_empty());

        let config = SearchConfig {
            metadata_mode: Some(MetadataMode::Neighbors),
            metadata_parent_property: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            config.headers(&names),
            vec![("X-METADATA-READ-MODE".to_string(), "neighbors".to_string())]
        );
    }
}
