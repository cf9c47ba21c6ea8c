use std::borrow::Cow;
use std::collections::HashMap;

/// HTTP request methods.
///
/// Only GET and POST are routed. Every other verb is still parsed so the
/// router can answer it with 404 instead of rejecting the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
    /// Any verb the server has no name for, kept verbatim
    Other(String),
}

/// Represents a parsed HTTP request from a client.
///
/// Header names are lower-cased when the request is parsed, so lookups
/// through [`Request::header`] are case-insensitive. The path and header
/// values are kept as raw bytes; nothing is decoded.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, not URL-decoded (e.g. b"/echo/abc")
    pub path: Vec<u8>,
    /// HTTP version token from the request line (typically "HTTP/1.1")
    pub version: String,
    /// Request headers keyed by lower-cased name; the last duplicate wins
    pub headers: HashMap<String, Vec<u8>>,
    /// Request body, only ever non-empty for POST
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<Vec<u8>>,
    version: Option<String>,
    headers: HashMap<String, Vec<u8>>,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use courier::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other(s) => s,
        }
    }

    /// Whether a request with this method may carry a Content-Length body.
    pub fn has_body(&self) -> bool {
        *self == Method::POST
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<Vec<u8>>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a header, normalising the name the same way the parser does.
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<[u8]>) -> Self {
        self.headers.insert(
            key.as_ref().trim().to_ascii_lowercase(),
            value.as_ref().trim_ascii().to_vec(),
        );
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Path for display and logging; invalid UTF-8 shows as U+FFFD.
    pub fn path_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }

    /// Raw header value by name, ignoring ASCII case.
    pub fn header_bytes(&self, key: &str) -> Option<&[u8]> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_slice())
    }

    /// Header value by name, ignoring ASCII case. `None` when the header is
    /// missing or is not valid UTF-8.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.header_bytes(key)
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Declared body length, if the Content-Length header is present and
    /// is a valid non-negative integer.
    pub fn content_length(&self) -> Option<usize> {
        self.header("content-length")
            .and_then(|v| v.parse().ok())
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// Keep-alive is the default; only `Connection: close` ends the session.
    pub fn keep_alive(&self) -> bool {
        !self
            .header_bytes("connection")
            .map(|v| v.eq_ignore_ascii_case(b"close"))
            .unwrap_or(false)
    }
}
