//! HTTP/1.1 protocol handling.
//!
//! Requests are parsed by hand from the socket buffer; there is no HTTP
//! library underneath.
//!
//! - **`connection`**: per-connection request/response state machine
//! - **`parser`**: incremental request parser over a byte buffer
//! - **`request`**: request type and header helpers
//! - **`response`**: response type and builder
//! - **`writer`**: response serialization and socket writes
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← request line, headers, optional body
//!        └──────┬──────┘
//!               │ Request parsed (or malformed → 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← route + handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```
//!
//! Reading also moves straight to Closed when the peer hangs up or the
//! server is shutting down.

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
