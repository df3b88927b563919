//! URL query-string parsing and serialization.
//!
//! The query string is the only persisted form of the listing state. This
//! module converts between the raw `application/x-www-form-urlencoded` text
//! and a flat [`QueryParams`] map; interpreting the keys is the codec's job.

use std::collections::BTreeMap;
use url::form_urlencoded;

/// Flat, string-keyed query representation.
///
/// A `BTreeMap` keeps serialization order deterministic so equal states
/// always produce byte-identical query strings.
pub type QueryParams = BTreeMap<String, String>;

/// Parses a query string into a parameter map.
///
/// A leading `?` is ignored. When a key repeats, the last occurrence wins.
/// Parsing never fails: undecodable percent sequences are kept verbatim by
/// the form-urlencoded parser.
///
/// # Examples
///
/// ```
/// use campus_discovery::infrastructure::query::parse_query;
///
/// let params = parse_query("?search=jazz+night&page=2&page=3");
/// assert_eq!(params.get("search").map(String::as_str), Some("jazz night"));
/// assert_eq!(params.get("page").map(String::as_str), Some("3"));
/// ```
#[must_use]
pub fn parse_query(raw: &str) -> QueryParams {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Serializes a parameter map into a query string without the leading `?`.
#[must_use]
pub fn to_query_string(params: &QueryParams) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_is_sorted_and_escaped() {
        let mut params = QueryParams::new();
        params.insert("tags".to_string(), "ai,tech".to_string());
        params.insert("search".to_string(), "rock & roll".to_string());

        assert_eq!(to_query_string(&params), "search=rock+%26+roll&tags=ai%2Ctech");
    }

    #[test]
    fn parse_inverts_serialization() {
        let mut params = QueryParams::new();
        params.insert("city".to_string(), "Bucure\u{219}ti".to_string());
        params.insert("search".to_string(), "a=b&c".to_string());

        assert_eq!(parse_query(&to_query_string(&params)), params);
    }

    #[test]
    fn empty_input_yields_no_params() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
    }
}
