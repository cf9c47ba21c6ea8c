use courier::http::request::{Method, Request, RequestBuilder};
use std::collections::HashMap;

fn request_with(headers: &[(&str, &str)]) -> Request {
    let mut builder = RequestBuilder::new().method(Method::GET).path("/");
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    builder.build().unwrap()
}

#[test]
fn test_request_header_lookup_ignores_case() {
    let req = request_with(&[("User-Agent", "curl/8.0"), ("Host", "example.com")]);

    assert_eq!(req.header("user-agent"), Some("curl/8.0"));
    assert_eq!(req.header("USER-AGENT"), Some("curl/8.0"));
    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_builder_normalizes_header_names() {
    let req = request_with(&[("  X-Thing ", "  value  ")]);

    assert_eq!(req.headers.get("x-thing").map(Vec::as_slice), Some(&b"value"[..]));
}

#[test]
fn test_non_utf8_header_value_is_only_available_as_bytes() {
    let req = request_with(&[]);
    let req = Request {
        headers: [("user-agent".to_string(), b"a\xffb".to_vec())].into_iter().collect(),
        ..req
    };

    assert_eq!(req.header_bytes("User-Agent"), Some(&b"a\xffb"[..]));
    assert_eq!(req.header("User-Agent"), None);
}

#[test]
fn test_path_lossy_for_display() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path(&b"/echo/\xff"[..])
        .build()
        .unwrap();

    assert_eq!(req.path, b"/echo/\xff");
    assert_eq!(req.path_lossy(), "/echo/\u{FFFD}");
}

#[test]
fn test_request_content_length_parsing() {
    let req = request_with(&[("Content-Length", "42")]);
    assert_eq!(req.content_length(), Some(42));
}

#[test]
fn test_request_content_length_missing() {
    let req = Request {
        method: Method::GET,
        path: b"/".to_vec(),
        version: "HTTP/1.1".to_string(),
        headers: HashMap::new(),
        body: vec![],
    };

    assert_eq!(req.content_length(), None);
}

#[test]
fn test_request_content_length_invalid() {
    assert_eq!(request_with(&[("Content-Length", "not-a-number")]).content_length(), None);
    assert_eq!(request_with(&[("Content-Length", "-5")]).content_length(), None);
}

#[test]
fn test_request_keep_alive_default() {
    assert!(request_with(&[]).keep_alive());
    assert!(request_with(&[("Connection", "keep-alive")]).keep_alive());
}

#[test]
fn test_request_keep_alive_close() {
    assert!(!request_with(&[("Connection", "close")]).keep_alive());
    assert!(!request_with(&[("Connection", "Close")]).keep_alive());
    assert!(!request_with(&[("connection", "CLOSE")]).keep_alive());
}

#[test]
fn test_request_method_parse() {
    assert_eq!(Method::parse("GET"), Method::GET);
    assert_eq!(Method::parse("POST"), Method::POST);
    assert_eq!(Method::parse("BREW"), Method::Other("BREW".to_string()));
    assert_eq!(Method::parse("get"), Method::Other("get".to_string())); // Case-sensitive
}

#[test]
fn test_method_display_round_trips_token() {
    assert_eq!(Method::PATCH.to_string(), "PATCH");
    assert_eq!(Method::Other("PROPFIND".into()).to_string(), "PROPFIND");
}

#[test]
fn test_only_post_carries_body() {
    assert!(Method::POST.has_body());
    assert!(!Method::GET.has_body());
    assert!(!Method::PUT.has_body());
}

#[test]
fn test_request_builder_requires_method_and_path() {
    assert!(RequestBuilder::new().path("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());

    let req = RequestBuilder::new().method(Method::GET).path("/").build().unwrap();
    assert_eq!(req.version, "HTTP/1.1");
}
