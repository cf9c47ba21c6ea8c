use crate::http::request::{Method, Request};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line or header block not terminated yet
    IncompleteHead,
    /// Head is complete but fewer body bytes are buffered than declared
    IncompleteBody { expected: usize, buffered: usize },
    /// Request line has fewer than three tokens
    MalformedRequestLine,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncompleteHead => write!(f, "incomplete request head"),
            ParseError::IncompleteBody { expected, buffered } => {
                write!(f, "truncated body: expected {} bytes, got {}", expected, buffered)
            }
            ParseError::MalformedRequestLine => write!(f, "malformed request line"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses one request from the front of `buf`.
///
/// On success returns the request and the number of bytes it occupied;
/// anything after that belongs to the next request on the connection.
/// The `Incomplete*` errors mean more bytes are needed. The request line is
/// validated as soon as its terminator arrives, before the headers.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    // Request line
    let (request_line, mut offset) = next_line(buf, 0).ok_or(ParseError::IncompleteHead)?;
    let mut parts = request_line
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    let (method, path, version) = match (parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(path), Some(version)) => (method, path, version),
        _ => return Err(ParseError::MalformedRequestLine),
    };

    let mut request = Request {
        method: Method::parse(&String::from_utf8_lossy(method)),
        path: path.to_vec(),
        version: String::from_utf8_lossy(version).into_owned(),
        headers: HashMap::new(),
        body: Vec::new(),
    };

    // Headers
    loop {
        let (line, next) = next_line(buf, offset).ok_or(ParseError::IncompleteHead)?;
        offset = next;

        if line.is_empty() {
            break;
        }

        // Lines without a colon are skipped, not rejected
        if let Some(colon) = line.iter().position(|&b| b == b':') {
            let name = String::from_utf8_lossy(line[..colon].trim_ascii()).to_ascii_lowercase();
            let value = line[colon + 1..].trim_ascii().to_vec();
            request.headers.insert(name, value);
        }
    }

    // Body
    let content_length = if request.method.has_body() {
        request.content_length().unwrap_or(0)
    } else {
        0
    };

    let buffered = buf.len() - offset;
    if buffered < content_length {
        return Err(ParseError::IncompleteBody {
            expected: content_length,
            buffered,
        });
    }

    request.body = buf[offset..offset + content_length].to_vec();

    Ok((request, offset + content_length))
}

/// Returns the line starting at `start` with its `\n` (and an optional
/// preceding `\r`) removed, plus the offset just past the terminator.
fn next_line(buf: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let rest = &buf[start..];
    let end = rest.iter().position(|&b| b == b'\n')?;
    let line = &rest[..end];
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    Some((line, start + end + 1))
}
