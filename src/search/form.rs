//! `application/x-www-form-urlencoded` bodies

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encode key-value pairs, keeping their order
pub fn encode<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k.as_ref(), FORM),
                utf8_percent_encode(v.as_ref(), FORM)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a form body into key-value pairs
pub fn decode(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            (unescape(k), unescape(v))
        })
        .collect()
}

fn unescape(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let pairs = vec![
            ("orderBy[]".to_string(), "https://vocab.example.org/title".to_string()),
            ("ftsQuery".to_string(), "a & b = c".to_string()),
        ];
        let body = encode(&pairs);
        assert!(body.starts_with("orderBy%5B%5D=https%3A%2F%2Fvocab.example.org%2Ftitle&"));
        assert_eq!(decode(&body), pairs);
    }

    #[test]
    fn test_decode_plus_and_bare_keys() {
        assert_eq!(
            decode("q=two+words&flag"),
            vec![
                ("q".to_string(), "two words".to_string()),
                ("flag".to_string(), String::new())
            ]
        );
    }
}
