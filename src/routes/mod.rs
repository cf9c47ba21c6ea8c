//! Request routing
//!
//! [`Route::resolve`] is a pure mapping from method and path to a route;
//! [`Router`] binds the resolved route to its handler and the file store.

pub mod handlers;

use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::server::state::ServerState;
use crate::store::FileStore;
use std::path::Path;
use std::sync::Arc;

const ECHO_PREFIX: &[u8] = b"/echo/";
const FILES_PREFIX: &[u8] = b"/files/";

/// A matched route. Borrowed segments are the raw path bytes after the
/// route prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Echo(&'a [u8]),
    UserAgent,
    FileGet(&'a [u8]),
    FilePost(&'a [u8]),
    NotFound,
}

impl<'a> Route<'a> {
    /// Matches exact routes before prefix routes; the first hit wins.
    pub fn resolve(method: &Method, path: &'a [u8]) -> Self {
        match method {
            Method::GET => {
                if path == b"/" {
                    Route::Root
                } else if let Some(rest) = path.strip_prefix(ECHO_PREFIX) {
                    Route::Echo(rest)
                } else if path == b"/user-agent" {
                    Route::UserAgent
                } else if let Some(name) = path.strip_prefix(FILES_PREFIX) {
                    Route::FileGet(name)
                } else {
                    Route::NotFound
                }
            }
            Method::POST => match path.strip_prefix(FILES_PREFIX) {
                Some(name) => Route::FilePost(name),
                None => Route::NotFound,
            },
            _ => Route::NotFound,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Echo(_) => "echo",
            Route::UserAgent => "user-agent",
            Route::FileGet(_) => "file-get",
            Route::FilePost(_) => "file-post",
            Route::NotFound => "not-found",
        }
    }
}

/// Dispatches requests to handlers. Shared by every connection.
/// The serve directory comes from the shared server state.
pub struct Router<S> {
    store: S,
    server: Arc<ServerState>,
}

impl<S: FileStore> Router<S> {
    pub fn new(store: S, server: Arc<ServerState>) -> Self {
        Self { store, server }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &Path {
        self.server.directory()
    }

    pub async fn handle(&self, req: &Request) -> Response {
        let route = Route::resolve(&req.method, &req.path);
        tracing::debug!(route = route.name(), path = %req.path_lossy(), "Route matched");

        match route {
            Route::Root => handlers::root(),
            Route::Echo(text) => handlers::echo(text),
            Route::UserAgent => handlers::user_agent(req),
            Route::FileGet(name) => handlers::file_get(&self.store, self.directory(), name).await,
            Route::FilePost(name) => {
                handlers::file_post(&self.store, self.directory(), name, &req.body).await
            }
            Route::NotFound => handlers::not_found(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(path: &[u8]) -> Route<'_> {
        Route::resolve(&Method::GET, path)
    }

    #[test]
    fn exact_routes() {
        assert_eq!(get(b"/"), Route::Root);
        assert_eq!(get(b"/user-agent"), Route::UserAgent);
        assert_eq!(get(b"/user-agent/x"), Route::NotFound);
    }

    #[test]
    fn prefix_routes_keep_raw_rest() {
        assert_eq!(get(b"/echo/a/b%20c"), Route::Echo(b"a/b%20c"));
        assert_eq!(get(b"/echo/a\xffb"), Route::Echo(b"a\xffb"));
        assert_eq!(get(b"/echo/"), Route::Echo(b""));
        assert_eq!(get(b"/echo"), Route::NotFound);
        assert_eq!(get(b"/files/x.bin"), Route::FileGet(b"x.bin"));
        assert_eq!(
            Route::resolve(&Method::POST, b"/files/x.bin"),
            Route::FilePost(b"x.bin")
        );
    }

    #[test]
    fn other_methods_fall_through() {
        assert_eq!(Route::resolve(&Method::POST, b"/"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::PUT, b"/files/a"), Route::NotFound);
        assert_eq!(
            Route::resolve(&Method::Other("BREW".into()), b"/"),
            Route::NotFound
        );
    }
}
