//! Stdio stream transport
//!
//! One JSON request envelope per line on stdin, one response envelope per
//! line on stdout, strictly request/response with no pipelining. Logs go to
//! stderr so stdout stays protocol-clean.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::core::dispatch::Dispatcher;
use crate::core::envelope::{CallRequest, CallResponse};

/// Dispatch one raw input line into a serialized response line.
///
/// A line that does not parse as a call envelope yields a failure response
/// with a null id; the connection stays usable.
pub async fn handle_line(dispatcher: &Dispatcher, line: &str) -> String {
    let response = match serde_json::from_str::<CallRequest>(line) {
        Ok(request) => dispatcher.dispatch(request).await,
        Err(err) => CallResponse::failure(Value::Null, format!("invalid request: {err}")),
    };

    serde_json::to_string(&response).unwrap_or_else(|err| {
        // Responses are plain data; serialization failing means a bug, but
        // the peer still deserves a well-formed envelope.
        format!(r#"{{"id":null,"ok":false,"result":null,"error":"failed to encode response: {err}"}}"#)
    })
}

/// Serve the dispatcher over stdin/stdout until EOF.
pub async fn serve(dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    tracing::info!("stdio transport ready");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&dispatcher, &line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("stdio transport closed");
    Ok(())
}
