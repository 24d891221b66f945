//! stdio transport

use std::future::Future;

use rmcp::ServiceExt;
use rmcp::transport::io::stdio;

use crate::server::ServerHandler;
use crate::{Error, Result};

/// Serve MCP over stdin/stdout until the client disconnects or `shutdown` resolves
pub async fn run_transport(
    handler: ServerHandler,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<()> {
    let server = handler
        .serve(stdio())
        .await
        .map_err(|e| Error::Transport(format!("Failed to start stdio transport: {e}")))?;

    // Dropping the running service on shutdown cancels it
    tokio::select! {
        result = server.waiting() => {
            result.map_err(|e| Error::Transport(format!("Stdio transport error: {e}")))?;
        }
        () = shutdown => {
            tracing::info!("Stopping stdio transport");
        }
    }

    Ok(())
}
