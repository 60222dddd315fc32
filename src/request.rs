//! Incoming HTTP request type.

use std::collections::HashMap;

use crate::method::Method;

/// An incoming HTTP request: method, target, headers, and the path
/// parameters filled in by the router. The body is never read; every route
/// is a read-only `GET`.
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Vec<(String, String)>,
    params: HashMap<String, String>,
}

impl Request {
    /// Builds a request for `target`, a path with an optional `?query`.
    ///
    /// The server builds requests from the wire; tests and in-process callers
    /// build them here and hand them to [`Router::call`](crate::Router::call).
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_owned(),
            query,
            headers: Vec::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub(crate) fn from_parts(method: Method, parts: &http::request::Parts) -> Self {
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        Self {
            method,
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers,
            params: HashMap::new(),
        }
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/people/{id}`, `req.param("id")` on `/people/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Whether the `Accept` header admits `mime`. A missing header admits
    /// everything.
    ///
    /// The most specific matching range decides, and a range with `q=0`
    /// refuses: `application/json;q=0, */*` does not admit JSON.
    pub fn accepts(&self, mime: &str) -> bool {
        let Some(accept) = self.header("accept") else { return true };
        let kind = mime.split_once('/').map_or(mime, |(kind, _)| kind);
        accept
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let range = parts.next().unwrap_or_default().trim();
                let specificity = if range.eq_ignore_ascii_case(mime) {
                    2
                } else if range.strip_suffix("/*").is_some_and(|k| k.eq_ignore_ascii_case(kind)) {
                    1
                } else if range == "*/*" {
                    0
                } else {
                    return None;
                };
                let q = parts
                    .filter_map(|param| param.trim().strip_prefix("q="))
                    .find_map(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((specificity, q))
            })
            .max_by_key(|(specificity, _)| *specificity)
            .is_some_and(|(_, q)| q > 0.0)
    }
}
