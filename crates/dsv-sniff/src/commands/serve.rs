//! Serve command — run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use dsv_sniff_core::config::Config;

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // Transport is always stdio; nothing to configure yet
}

/// Serve MCP requests on stdin/stdout until the client disconnects.
///
/// Tools fall back to the configured detection options. Logging must stay
/// on stderr since stdout carries the protocol.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let server = ProjectServer::with_defaults(config.detect_options(), max_input_bytes);
    info!(max_input_bytes = ?max_input_bytes, "starting MCP server on stdio");

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await.context("MCP server terminated")?;

    info!("MCP server stopped");
    Ok(())
}
