//! Transport adapters
//!
//! Two delivery mechanisms for the same dispatch core: a half-duplex
//! newline-delimited stdio stream and an HTTP server pushing results over a
//! server-sent event stream. Neither retries a request; each received
//! envelope is dispatched at most once and the response is correlated back
//! by the request id.

pub mod sse;
pub mod stdio;
