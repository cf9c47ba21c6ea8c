use std::fmt::Write as _;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Wire form of a response: status line, headers, blank line, body.
pub fn serialize_response(resp: &Response) -> Bytes {
    let head_len: usize = resp.headers.iter().map(|(k, v)| k.len() + v.len() + 4).sum();
    let mut buf = BytesMut::with_capacity(32 + head_len + resp.body.len());

    // Writing into BytesMut grows the buffer and cannot fail
    let _ = write!(
        buf,
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    for (name, value) in &resp.headers {
        let _ = write!(buf, "{}: {}\r\n", name, value);
    }
    buf.put_slice(b"\r\n");
    buf.put_slice(&resp.body);

    buf.freeze()
}

/// A serialized response being drained onto a stream. The buffer is
/// consumed as bytes are accepted, so a retry resumes where it stopped.
pub struct ResponseWriter {
    pending: Bytes,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            pending: serialize_response(response),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all_buf(&mut self.pending).await?;
        stream.flush().await?;
        Ok(())
    }
}
