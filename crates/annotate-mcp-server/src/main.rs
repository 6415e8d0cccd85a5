//! annotate-mcp: screenshot annotation MCP server over stdio

use std::sync::Arc;

use annotate_core::{
    composite::{Annotator, ResvgCompositor},
    config::RenderConfig,
};
use annotate_mcp_server::mcp::AnnotateMcpServer;
use anyhow::Result;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("annotate_mcp_server=info,annotate_core=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();

    info!("annotate-mcp server starting...");
    info!("Protocol: Model Context Protocol (MCP)");
    info!("Transport: stdio");

    let config = RenderConfig::from_env();
    info!(
        "Config: theme={}, max_annotations={}, jpeg_quality={}",
        config.default_theme, config.max_annotations, config.jpeg_quality
    );

    let compositor = ResvgCompositor::new()
        .with_font_family(&config.font_family)
        .with_jpeg_quality(config.jpeg_quality);
    info!("Compositor initialized: {:?}", compositor);

    let server = AnnotateMcpServer::new(Annotator::new(Arc::new(compositor), config));

    let service = server.serve(stdio()).await?;

    info!("annotate-mcp server initialized successfully");
    info!("Server info: {:?}", service.peer_info());
    info!("Waiting for MCP requests...");

    service.waiting().await?;

    info!("annotate-mcp server shutting down");
    Ok(())
}
