//! Stdio MCP transport.
//!
//! stdout carries JSON-RPC frames, so nothing else may print there; all
//! diagnostics go through tracing to stderr.

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing::{info, warn};

use crate::handler::MemeHandler;
use crate::registry;

/// Run MCP server over stdin/stdout until EOF.
pub async fn run(handler: MemeHandler) -> Result<()> {
    if !handler.dispatcher().client().has_credentials() {
        warn!("IMGFLIP_USERNAME and IMGFLIP_PASSWORD are not set");
        warn!("Only the popular template list will work; search and meme creation will fail");
    }

    info!("Available tools:");
    for op in registry::operations() {
        info!("  {} - {}", op.name, op.description);
    }

    let service = handler
        .serve(stdio())
        .await
        .context("Failed to start stdio MCP service")?;

    info!("Stdio MCP server running");

    service.waiting().await?;

    info!("Stdio MCP server shutdown");
    Ok(())
}
