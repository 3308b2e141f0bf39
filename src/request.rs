//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::request::Parts;
use http::{Extensions, HeaderMap, Method};

/// An incoming HTTP request with its body fully read.
///
/// Build one from an [`http::Request`] when driving a [`Router`](crate::Router)
/// directly, e.g. in tests:
///
/// ```rust
/// use reqlog::Request;
///
/// let req = Request::from(
///     http::Request::get("/users/42?full=1")
///         .header("x-request-id", "abc-123")
///         .body(bytes::Bytes::new())
///         .unwrap(),
/// );
/// assert_eq!(req.uri(), "/users/42?full=1");
/// assert_eq!(req.header("X-Request-ID"), Some("abc-123"));
/// ```
#[derive(Debug)]
pub struct Request {
    parts: Parts,
    body: Bytes,
    params: HashMap<String, String>,
    remote_addr: Option<SocketAddr>,
}

impl Request {
    pub(crate) fn new(parts: Parts, body: Bytes, remote_addr: Option<SocketAddr>) -> Self {
        Self { parts, body, params: HashMap::new(), remote_addr }
    }

    /// Sets the peer address, as the server does for every connection.
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn method(&self) -> &Method { &self.parts.method }
    pub fn path(&self) -> &str { self.parts.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.parts.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn extensions(&self) -> &Extensions { &self.parts.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.parts.extensions }
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }

    /// The request target as sent: path plus query string.
    pub fn uri(&self) -> &str {
        self.parts.uri.path_and_query().map_or("/", |pq| pq.as_str())
    }

    /// The peer address as text, or an empty string when unknown.
    pub fn remote_address(&self) -> String {
        self.remote_addr.map(|addr| addr.to_string()).unwrap_or_default()
    }

    /// Case-insensitive header lookup. Values that are not visible ASCII
    /// read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

impl<B: Into<Bytes>> From<http::Request<B>> for Request {
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts, body.into(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request {
        Request::from(http::Request::get(uri).body(Bytes::new()).unwrap())
    }

    #[test]
    fn uri_keeps_query_string() {
        assert_eq!(request("/search?q=rust").uri(), "/search?q=rust");
        assert_eq!(request("/search?q=rust").path(), "/search");
    }

    #[test]
    fn remote_address_is_empty_when_unknown() {
        let req = request("/");
        assert_eq!(req.remote_address(), "");

        let req = req.with_remote_addr("10.0.0.7:51234".parse().unwrap());
        assert_eq!(req.remote_address(), "10.0.0.7:51234");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::from(
            http::Request::get("/")
                .header("X-Request-Id", "abc")
                .body(Bytes::new())
                .unwrap(),
        );
        assert_eq!(req.header("x-request-id"), Some("abc"));
        assert_eq!(req.header("X-REQUEST-ID"), Some("abc"));
        assert_eq!(req.header("x-missing"), None);
    }
}
