use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::routes::Router;
use crate::server::state::ServerState;
use crate::store::FileStore;

const READ_CHUNK: usize = 4096;

/// One accepted client connection, served until it closes.
pub struct Connection<T, S> {
    stream: T,
    buffer: BytesMut,
    state: ConnectionState,
    router: Arc<Router<S>>,
    server: Arc<ServerState>,
    peer: String,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

/// Result of waiting for the next request on the socket.
#[derive(Debug)]
pub enum ReadOutcome {
    Request(Request),
    /// Unparseable request; answered with 400 and the connection closes
    Malformed(ParseError),
    /// Peer closed the stream between requests or mid-head
    Ended,
}

impl<T, S> Connection<T, S>
where
    T: AsyncRead + AsyncWrite + Unpin,
    S: FileStore,
{
    pub fn new(stream: T, router: Arc<Router<S>>, server: Arc<ServerState>, peer: impl Into<String>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            router,
            server,
            peer: peer.into(),
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    // Loop-back point: a pending shutdown ends the session here
                    if self.server.is_shutting_down() {
                        tracing::debug!(peer = %self.peer, "Closing connection for shutdown");
                        self.state = ConnectionState::Closed;
                        continue;
                    }

                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Malformed(e) => {
                            tracing::warn!(peer = %self.peer, error = %e, "Bad request");
                            let writer = ResponseWriter::new(&Response::bad_request());
                            ConnectionState::Writing(writer, false)
                        }
                        ReadOutcome::Ended => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    tracing::info!(
                        peer = %self.peer,
                        method = %req.method,
                        path = %req.path_lossy(),
                        "Request received"
                    );

                    let response = self.router.handle(req).await;
                    let keep_alive = req.keep_alive() && !response.status.is_server_error();

                    tracing::debug!(
                        peer = %self.peer,
                        status = response.status.as_u16(),
                        keep_alive,
                        "Response ready"
                    );

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        // Best effort; the socket is released on drop either way
        let _ = self.stream.shutdown().await;
        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            // Try parsing whatever we already have
            let pending = match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    // Keep any bytes of a following request
                    self.buffer.advance(consumed);
                    return Ok(ReadOutcome::Request(request));
                }

                Err(ParseError::MalformedRequestLine) => {
                    return Ok(ReadOutcome::Malformed(ParseError::MalformedRequestLine));
                }

                Err(incomplete) => incomplete,
            };

            // Read more data
            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // A body cut short is an error; anything else is a plain hang-up
                return Ok(match pending {
                    ParseError::IncompleteBody { .. } => ReadOutcome::Malformed(pending),
                    _ => ReadOutcome::Ended,
                });
            }
        }
    }
}
