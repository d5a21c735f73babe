//! Stagehand - desktop automation tool server
//!
//! This library exposes desktop-automation primitives (mouse, keyboard,
//! clipboard, screen, window, process and system control) as named,
//! schema-described tools behind a request/response protocol server, so a
//! remote agent (e.g. an AI assistant) can drive a desktop GUI
//! programmatically.
//!
//! ## Architecture
//!
//! - A [`core::registry::ToolRegistry`] maps tool names to declarative
//!   parameter schemas and handler functions, built once at startup.
//! - The [`core::dispatch::Dispatcher`] turns an incoming call envelope into
//!   a uniform success/failure response envelope.
//! - Handlers extract typed arguments via [`core::codec::Args`] and delegate
//!   to a [`provider::CapabilityProvider`], the abstract automation backend.
//! - Two [`transport`] adapters deliver calls to the same dispatcher: a
//!   newline-delimited stdio stream and an HTTP server with a server-sent
//!   event push stream.
//!
//! The actual OS-level input injection and pixel capture live behind the
//! provider trait; this crate ships an in-memory simulated desktop for
//! development and testing.

pub mod core;
pub mod provider;
pub mod tools;
pub mod transport;

/// Server name reported in system info and logs
pub const SERVER_NAME: &str = "stagehand";
/// Server version reported in system info and logs
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
