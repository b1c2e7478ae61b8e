//! MCP server entrypoint (stdio transport).
//!
//! Launches an MCP server that exposes Rusty Digest's tools and resources over stdio. Logs go
//! to the log file only, since stdout carries the protocol stream. Runtime configuration is
//! shared with the HTTP binary.
use anyhow::{Context, Result};
use rmcp::{service::ServiceExt, transport::stdio};
use rustydigest::{config, logging, mcp::RustyDigestMcpServer, pipeline::DigestService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing(false);

    let digest = DigestService::new().context("failed to initialize digest service")?;
    let server = RustyDigestMcpServer::new(Arc::new(digest));

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
