//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use http::request::Parts;

use crate::middleware::admission::Classification;

/// An incoming request, after routing.
///
/// The proxy only serves reads, so the body is dropped at the server edge and
/// never reaches a handler.
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) params: HashMap<String, String>,
    pub(crate) remote_addr: SocketAddr,
}

impl Request {
    pub(crate) fn new(
        parts: Parts,
        params: HashMap<String, String>,
        remote_addr: SocketAddr,
    ) -> Self {
        Self { parts, params, remote_addr }
    }

    pub fn path(&self) -> &str { self.parts.uri.path() }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `User-Agent` header, or `""` when missing.
    pub fn user_agent(&self) -> &str {
        self.header("user-agent").unwrap_or("")
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/{username}`, `req.param("username")` on `/alice` returns `Some("alice")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// First value of a query-string parameter, percent-decoded.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.parts.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Path plus query, as the client sent it.
    pub fn path_and_query(&self) -> &str {
        self.parts
            .uri
            .path_and_query()
            .map_or_else(|| self.path(), |pq| pq.as_str())
    }

    /// Best guess at the originating client address.
    ///
    /// Behind nginx the socket peer is the proxy, so `X-Forwarded-For` (first
    /// hop) and then `X-Real-IP` take precedence over it.
    pub fn client_ip(&self) -> String {
        if let Some(forwarded) = self.header("x-forwarded-for") {
            if let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty()) {
                return first.to_owned();
            }
        }
        if let Some(real) = self.header("x-real-ip").map(str::trim).filter(|s| !s.is_empty()) {
            return real.to_owned();
        }
        self.remote_addr.ip().to_string()
    }

    /// The classification the admission stage attached to this request.
    pub fn classification(&self) -> Option<&Classification> {
        self.parts.extensions.get::<Classification>()
    }

    pub(crate) fn extensions_mut(&mut self) -> &mut http::Extensions {
        &mut self.parts.extensions
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::get;

    #[test]
    fn query_values_are_decoded() {
        let req = get("/api/alice/crates?page=2&search=deep%20house&sort=", "ua", &[]);
        assert_eq!(req.query("page").as_deref(), Some("2"));
        assert_eq!(req.query("search").as_deref(), Some("deep house"));
        assert_eq!(req.query("sort").as_deref(), Some(""));
        assert_eq!(req.query("size"), None);
    }

    fn with_headers(headers: &[(&str, &str)]) -> super::Request {
        let mut builder = http::Request::builder().uri("/alice");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        super::Request::new(parts, Default::default(), "10.0.0.1:1".parse().unwrap())
    }

    #[test]
    fn client_ip_prefers_forwarded_headers() {
        let req = with_headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.2"),
            ("x-real-ip", "198.51.100.1"),
        ]);
        assert_eq!(req.client_ip(), "203.0.113.7");

        let req = with_headers(&[("x-real-ip", "198.51.100.1")]);
        assert_eq!(req.client_ip(), "198.51.100.1");

        let req = with_headers(&[]);
        assert_eq!(req.client_ip(), "10.0.0.1");
    }

    #[test]
    fn missing_user_agent_reads_empty() {
        let req = get("/alice", "", &[("username", "alice")]);
        assert_eq!(req.user_agent(), "");
        assert_eq!(req.param("username"), Some("alice"));
        assert_eq!(req.path_and_query(), "/alice");
    }
}
