//! Stagehand - desktop automation tool server
//!
//! Serves the tool catalog over one of two transports: a newline-delimited
//! stdio stream or an HTTP server with a server-sent event push stream.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use stagehand::core::dispatch::Dispatcher;
use stagehand::{SERVER_NAME, SERVER_VERSION, provider, tools, transport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Newline-delimited JSON over stdin/stdout
    Stdio,
    /// HTTP server with a server-sent event push stream
    Sse,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "stagehand")]
struct Cli {
    /// Transport to serve
    #[arg(short, long, value_enum, default_value_t = Transport::Sse)]
    transport: Transport,
    /// Host to bind the SSE server to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind the SSE server to
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr to keep stdout clean for the stdio protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting {SERVER_NAME} v{SERVER_VERSION}");

    let provider = provider::create_provider()?;
    let registry = tools::build_registry();
    tracing::info!(tools = registry.len(), "tool registry built");

    let dispatcher = Arc::new(Dispatcher::new(registry, provider));

    match cli.transport {
        Transport::Stdio => transport::stdio::serve(dispatcher).await?,
        Transport::Sse => {
            let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
            transport::sse::serve(dispatcher, addr).await?;
        }
    }

    Ok(())
}
