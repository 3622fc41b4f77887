//! Request decomposition.
//!
//! # Responsibilities
//! - Split a raw URL (absolute, or path with query) into a path segment and
//!   a flat parameter map
//! - Percent-decode the path, parameter keys and values
//!
//! # Design Decisions
//! - Never fails: malformed input degrades to a best-effort split on `?`
//! - One value per key, the last occurrence wins
//! - Input without a scheme is always a path, even when it starts with `//`
//! - The decoded path is compared against plain group names, so `Ämter` and
//!   `%C3%84mter` address the same group

use std::collections::BTreeMap;

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::{form_urlencoded, Url};

/// Base used to resolve inputs that carry no scheme or host.
const PLACEHOLDER_BASE: &str = "http://localhost/";

/// Query parameters of a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    params: BTreeMap<String, String>,
}

impl ParameterMap {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (without the leading `?`).
    ///
    /// Pairs split on the first `=`, so `a=b=c` yields `a → "b=c"`. A pair
    /// without `=` maps to the empty string. `+` decodes to a space.
    pub fn from_query(query: &str) -> Self {
        form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Inserts a parameter, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns an iterator over the parameters, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Re-encodes the parameters as a query string.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// The routing-relevant parts of a request URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTarget {
    /// Path without scheme, host, query or leading slash. Empty for root.
    pub path: String,
    pub params: ParameterMap,
}

impl RequestTarget {
    pub fn new(path: impl Into<String>, params: ParameterMap) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }
}

/// Decomposes a URL-like string into path and parameters.
pub fn decompose(url: &str) -> RequestTarget {
    let parsed = Url::parse(url).or_else(|_| {
        // Collapse leading slashes so `//Group` is not read as a host.
        let relative = format!("/{}", url.trim_start_matches('/'));
        Url::parse(PLACEHOLDER_BASE).and_then(|base| base.join(&relative))
    });

    match parsed {
        Ok(parsed) => RequestTarget::new(
            decode_path(parsed.path()),
            ParameterMap::from_query(parsed.query().unwrap_or_default()),
        ),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "URL did not parse, splitting on '?'");
            split_raw(url)
        }
    }
}

fn split_raw(url: &str) -> RequestTarget {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let (path, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));
    RequestTarget::new(decode_path(path), ParameterMap::from_query(query))
}

/// Drops one leading slash and percent-decodes the rest. Invalid UTF-8
/// sequences become U+FFFD.
fn decode_path(path: &str) -> Cow<'_, str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    percent_decode_str(path).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        let target = decompose("https://service.example.org/Eheschliessung?leika=99059001000000&oeid=2289");
        assert_eq!(target.path, "Eheschliessung");
        assert_eq!(target.params.get("leika"), Some("99059001000000"));
        assert_eq!(target.params.get("oeid"), Some("2289"));
        assert_eq!(target.params.len(), 2);
    }

    #[test]
    fn test_path_with_query() {
        let target = decompose("/Eheschliessung?leika=1");
        assert_eq!(target.path, "Eheschliessung");
        assert_eq!(target.params.get("leika"), Some("1"));

        let target = decompose("Eheschliessung?leika=1");
        assert_eq!(target.path, "Eheschliessung");
    }

    #[test]
    fn test_root_and_empty() {
        assert_eq!(decompose("https://example.org/").path, "");
        assert_eq!(decompose("https://example.org").path, "");
        assert_eq!(decompose("/").path, "");
        assert_eq!(decompose(""), RequestTarget::default());
    }

    #[test]
    fn test_only_leading_slash_is_removed() {
        assert_eq!(decompose("/a/b/").path, "a/b/");
    }

    #[test]
    fn test_empty_query() {
        assert!(decompose("/path?").params.is_empty());
        assert!(decompose("?").params.is_empty());
        assert!(decompose("/path").params.is_empty());
    }

    #[test]
    fn test_key_without_value() {
        let target = decompose("/p?flag&x=1");
        assert_eq!(target.params.get("flag"), Some(""));
        assert_eq!(target.params.get("x"), Some("1"));
    }

    #[test]
    fn test_value_keeps_extra_equals() {
        let target = decompose("/p?token=abc==&q=a=b=c");
        assert_eq!(target.params.get("token"), Some("abc=="));
        assert_eq!(target.params.get("q"), Some("a=b=c"));
    }

    #[test]
    fn test_percent_decoding() {
        let target = decompose("/p?na%6De=J%C3%BCrgen%20M&city=New+York");
        assert_eq!(target.params.get("name"), Some("Jürgen M"));
        assert_eq!(target.params.get("city"), Some("New York"));
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let target = decompose("/p?k=a&k=b");
        assert_eq!(target.params.get("k"), Some("b"));
        assert_eq!(target.params.len(), 1);
    }

    #[test]
    fn test_fragment_is_dropped() {
        let target = decompose("https://example.org/Group?k=v#section");
        assert_eq!(target.path, "Group");
        assert_eq!(target.params.get("k"), Some("v"));
    }

    #[test]
    fn test_malformed_url_degrades() {
        let target = decompose("http://[broken/Group?k=v");
        assert_eq!(target.path, "http://[broken/Group");
        assert_eq!(target.params.get("k"), Some("v"));
    }

    #[test]
    fn test_path_is_percent_decoded() {
        assert_eq!(decompose("/Ämter?k=1").path, "Ämter");
        assert_eq!(decompose("/%C3%84mter?k=1").path, "Ämter");
        assert_eq!(decompose("Eheschließung").path, "Eheschließung");
        assert_eq!(decompose("https://example.org/Eheschlie%C3%9Fung").path, "Eheschließung");
        assert_eq!(decompose("/Standes%20amt").path, "Standes amt");
    }

    #[test]
    fn test_invalid_utf8_in_path_is_replaced() {
        assert_eq!(decompose("/a%FFb").path, "a\u{FFFD}b");
    }

    #[test]
    fn test_double_slash_is_a_path_not_a_host() {
        let target = decompose("//Group?k=v");
        assert_eq!(target.path, "Group");
        assert_eq!(target.params.get("k"), Some("v"));
        assert_eq!(decompose("///Group").path, "Group");
    }

    #[test]
    fn test_plus_in_query_decodes_to_space() {
        assert_eq!(decompose("/p?k=a+b").params.get("k"), Some("a b"));
        assert_eq!(decompose("/p?k=a%2Bb").params.get("k"), Some("a+b"));
    }

    #[test]
    fn test_query_round_trip() {
        let params: ParameterMap = [("leika", "99059001000000"), ("note", "a b&c=d"), ("empty", "")]
            .into_iter()
            .collect();
        let rebuilt = decompose(&format!("/Group?{}", params.to_query_string()));
        assert_eq!(rebuilt.params, params);
    }
}
