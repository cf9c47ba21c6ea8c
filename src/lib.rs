//! Courier - minimal HTTP/1.1 file server
//!
//! Core library: hand-rolled request parsing, routing, connection
//! handling and the accept loop / admin console pair.

pub mod config;
pub mod http;
pub mod routes;
pub mod server;
pub mod store;
