//! Request facts.
//!
//! # Responsibilities
//! - Snapshot the inbound request once (uri, path, method, variables)
//! - Split the path into segments for positional lookups
//! - Select the variable source (query string or form body)
//!
//! # Design Decisions
//! - Immutable after construction; one snapshot per request
//! - Query variables, when present, shadow the body entirely (no merge)
//! - Only `application/x-www-form-urlencoded` POST bodies contribute variables
//! - Routes match against the path; the query string is not part of it

use std::collections::HashMap;

use axum::http::{header, request::Parts, Method};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Immutable snapshot of the inbound request.
#[derive(Debug, Clone)]
pub struct RequestFacts {
    uri: String,
    path: String,
    method: Method,
    method_lower: String,
    variables: HashMap<String, String>,
    segments: Vec<String>,
}

impl RequestFacts {
    /// Build facts from a method, a path-and-query string, and body variables.
    ///
    /// `body_vars` are only used when the query string carries no variables.
    pub fn new<I, K, V>(method: Method, uri: &str, body_vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };

        let mut variables = parse_pairs(query.as_bytes());
        if variables.is_empty() {
            variables = body_vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();
        }

        Self {
            uri: uri.to_string(),
            path: path.to_string(),
            method_lower: method.as_str().to_lowercase(),
            method,
            variables,
            segments: split_segments(path),
        }
    }

    /// Build facts from request parts and the buffered body.
    ///
    /// The body is only decoded for POST requests with a form content type.
    pub fn from_parts(parts: &Parts, body: &[u8]) -> Self {
        let uri = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());

        let is_form = parts.method == Method::POST
            && parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE))
                .unwrap_or(false);

        let body_vars = if is_form { parse_pairs(body) } else { HashMap::new() };

        Self::new(parts.method.clone(), uri, body_vars)
    }

    /// The request path and query, as received.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The request path, without query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lower-cased method name (`get`, `post`, ...).
    pub fn method(&self) -> &str {
        &self.method_lower
    }

    pub fn http_method(&self) -> &Method {
        &self.method
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    /// A query-string or body variable.
    pub fn variable(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    /// The path segment at zero-based `level`.
    pub fn segment(&self, level: usize) -> Option<&str> {
        self.segments.get(level).map(String::as_str)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Decode `application/x-www-form-urlencoded` pairs. Later keys overwrite earlier ones.
fn parse_pairs(input: &[u8]) -> HashMap<String, String> {
    form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Trim `/` from both ends and split on `/`.
///
/// An empty path yields no segments; `/` yields a single empty segment.
fn split_segments(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    path.trim_matches('/').split('/').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn no_body() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_segments() {
        let facts = RequestFacts::new(Method::GET, "/user/42/", no_body());
        assert_eq!(facts.segment(0), Some("user"));
        assert_eq!(facts.segment(1), Some("42"));
        assert_eq!(facts.segment(2), None);
        assert_eq!(facts.segment_count(), 2);
    }

    #[test]
    fn test_root_segments() {
        let facts = RequestFacts::new(Method::GET, "/", no_body());
        assert_eq!(facts.segments(), &[String::new()]);

        let facts = RequestFacts::new(Method::GET, "", no_body());
        assert_eq!(facts.segment_count(), 0);
    }

    #[test]
    fn test_query_excluded_from_path() {
        let facts = RequestFacts::new(Method::GET, "/search/?q=rust&page=2", no_body());
        assert_eq!(facts.path(), "/search/");
        assert_eq!(facts.uri(), "/search/?q=rust&page=2");
        assert_eq!(facts.variable("q"), Some("rust"));
        assert_eq!(facts.variable("page"), Some("2"));
        assert_eq!(facts.segment_count(), 1);
    }

    #[test]
    fn test_method_is_lowercased() {
        let facts = RequestFacts::new(Method::DELETE, "/", no_body());
        assert_eq!(facts.method(), "delete");
        assert!(!facts.is_get());

        let facts = RequestFacts::new(Method::POST, "/", no_body());
        assert!(facts.is_post());
    }

    #[test]
    fn test_query_shadows_body() {
        let facts = RequestFacts::new(Method::POST, "/form?source=query", vec![("name", "body")]);
        assert_eq!(facts.variable("source"), Some("query"));
        assert_eq!(facts.variable("name"), None);
    }

    #[test]
    fn test_body_used_without_query() {
        let facts = RequestFacts::new(Method::POST, "/form", vec![("name", "alice")]);
        assert_eq!(facts.variable("name"), Some("alice"));
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let facts = RequestFacts::new(Method::GET, "/?tag=a&tag=b", no_body());
        assert_eq!(facts.variable("tag"), Some("b"));
    }

    #[test]
    fn test_from_parts_form_body() {
        let (parts, _) = Request::builder()
            .method("POST")
            .uri("http://example.com/login")
            .header("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
            .body(())
            .unwrap()
            .into_parts();

        let facts = RequestFacts::from_parts(&parts, b"user=alice+smith&remember=1");
        assert_eq!(facts.path(), "/login");
        assert_eq!(facts.variable("user"), Some("alice smith"));
        assert_eq!(facts.variable("remember"), Some("1"));
    }

    #[test]
    fn test_from_parts_ignores_non_form_body() {
        let (parts, _) = Request::builder()
            .method("POST")
            .uri("/api")
            .header("Content-Type", "application/json")
            .body(())
            .unwrap()
            .into_parts();

        let facts = RequestFacts::from_parts(&parts, b"user=alice");
        assert!(facts.variables().is_empty());
    }

    #[test]
    fn test_from_parts_ignores_form_body_on_other_methods() {
        for method in ["PUT", "PATCH", "DELETE"] {
            let (parts, _) = Request::builder()
                .method(method)
                .uri("/item")
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(())
                .unwrap()
                .into_parts();

            let facts = RequestFacts::from_parts(&parts, b"name=alice");
            assert_eq!(facts.variable("name"), None, "{method} body must be ignored");
            assert!(facts.variables().is_empty());
        }
    }
}
