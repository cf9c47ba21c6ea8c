//! Route handlers
//!
//! Handlers build a complete [`Response`]; they never touch the socket.

use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::store::{FileStore, StoreError};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::ffi::OsStr;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;

pub fn root() -> Response {
    Response::empty(StatusCode::Ok)
}

pub fn echo(text: &[u8]) -> Response {
    Response::text(text)
}

/// Reflects the User-Agent header; a missing header yields an empty body.
pub fn user_agent(req: &Request) -> Response {
    Response::text(req.header_bytes("user-agent").unwrap_or_default())
}

pub fn not_found() -> Response {
    Response::not_found()
}

pub async fn file_get<S: FileStore>(store: &S, directory: &Path, name: &[u8]) -> Response {
    let path = resolve_path(directory, name);

    match store.read(&path).await {
        Ok(data) => Response::octet_stream(data),
        Err(StoreError::NotFound) => Response::not_found(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "File read failed");
            Response::not_found()
        }
    }
}

pub async fn file_post<S: FileStore>(store: &S, directory: &Path, name: &[u8], body: &[u8]) -> Response {
    let path = resolve_path(directory, name);

    match store.write(&path, body).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), bytes = body.len(), "File written");
            Response::empty(StatusCode::Created)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "File write failed");
            Response::internal_error()
        }
    }
}

/// Joins the raw `name` bytes onto the serve directory literally. Leading
/// slashes are dropped so the result stays a child path; `..` is left
/// untouched.
pub fn resolve_path(directory: &Path, name: &[u8]) -> PathBuf {
    let start = name.iter().position(|&b| b != b'/').unwrap_or(name.len());
    directory.join(segment_path(&name[start..]))
}

#[cfg(unix)]
fn segment_path(segment: &[u8]) -> PathBuf {
    PathBuf::from(OsStr::from_bytes(segment))
}

#[cfg(not(unix))]
fn segment_path(segment: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(segment).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_is_literal_join() {
        let dir = Path::new("/srv/files");
        assert_eq!(resolve_path(dir, b"a.txt"), PathBuf::from("/srv/files/a.txt"));
        assert_eq!(resolve_path(dir, b"/etc/passwd"), PathBuf::from("/srv/files/etc/passwd"));
        assert_eq!(resolve_path(dir, b"sub/b"), PathBuf::from("/srv/files/sub/b"));
        assert_eq!(resolve_path(dir, b"../x"), PathBuf::from("/srv/files/../x"));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_path_keeps_non_utf8_bytes() {
        let path = resolve_path(Path::new("/srv"), b"a\xffb");
        assert_eq!(path.as_os_str().as_bytes(), b"/srv/a\xffb");
    }

    #[test]
    fn echo_sets_length_in_bytes() {
        let resp = echo("héllo".as_bytes());
        assert_eq!(resp.header("Content-Length"), Some("6"));
        assert_eq!(resp.body, "héllo".as_bytes());
    }

    #[test]
    fn echo_passes_invalid_utf8_through() {
        let resp = echo(b"a\xffb");
        assert_eq!(resp.header("Content-Length"), Some("3"));
        assert_eq!(resp.body, vec![b'a', 0xff, b'b']);
    }
}
