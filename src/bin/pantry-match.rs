//! pantry-match -- MCP server for ingredient-based recipe matching.
//!
//! Usage: pantry-match [--catalog <dir>]
//!
//! Without `--catalog`, the `PANTRY_CATALOG` environment variable is used.
//! With neither, the server starts with an empty catalog.

use std::path::PathBuf;

const CATALOG_ENV: &str = "PANTRY_CATALOG";

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interfere with MCP stdio.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let catalog_dir = std::env::args()
        .skip_while(|a| a != "--catalog")
        .nth(1)
        .or_else(|| std::env::var(CATALOG_ENV).ok())
        .map(PathBuf::from)
        .map(|p| p.canonicalize())
        .transpose()?;

    let config = pantry_match::server::McpServerConfig { catalog_dir };

    pantry_match::run_mcp_server(config)
}
