//! Protocol-agnostic dispatch core
//!
//! Everything a transport needs to turn bytes into tool invocations: the
//! argument codec, the tool registry, the call/response envelope and the
//! dispatcher itself.

pub mod codec;
pub mod dispatch;
pub mod envelope;
pub mod registry;

use thiserror::Error;

/// Failure raised while resolving or executing a tool invocation.
///
/// Every variant collapses into the same `ok: false, error: <message>`
/// envelope on the wire; callers distinguish them by message text only.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required argument was absent (or present with the wrong type).
    #[error("required parameter '{0}' is missing")]
    MissingParameter(String),

    /// The requested tool name is not in the registry.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A result image could not be encoded for the wire.
    #[error("failed to encode image: {0}")]
    ImageEncoding(#[from] image::ImageError),

    /// The capability provider reported an OS-level failure. The alternate
    /// format renders the whole context chain, e.g.
    /// `failed to kill process: process 999 not found`.
    #[error("{0:#}")]
    Provider(#[from] anyhow::Error),
}
