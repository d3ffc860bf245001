//! MCP Server: stdio transport, JSON-RPC 2.0, newline-delimited.
//!
//! Exposes recipe matching, serving scaling and label post-processing as MCP
//! tools. The loop itself is generic over reader and writer; the binary runs
//! it on stdin/stdout.
//!
//! Protocol flow:
//! 1. Client sends `initialize` → server responds with capabilities
//! 2. Client sends `notifications/initialized`
//! 3. Client sends `tools/list` → server returns tool definitions
//! 4. Client sends `tools/call` → server runs the tool and returns its JSON
//! 5. Client closes stdin → server exits

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::catalog::RecipeCatalog;
use crate::tools::ToolRouter;

/// Maximum size of a single JSON-RPC line (10 MiB).
const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

const PROTOCOL_VERSION: &str = "2025-06-18";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 types
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// MCP protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult {
    protocol_version: &'static str,
    capabilities: serde_json::Value,
    server_info: ServerInfo,
}

/// MCP tool definition for tools/list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolsListResult {
    tools: Vec<ToolDefinition>,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

/// MCP content item in tools/call response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// MCP tools/call result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ContentItem>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// A successful result carrying one text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem {
                content_type: "text".to_owned(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    /// A tool-level failure, reported to the client as `isError: true`.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            is_error: true,
            ..Self::text(format!("Error: {message}"))
        }
    }

    /// A successful result whose text is `value` as pretty JSON.
    pub fn json(value: &impl Serialize) -> Result<Self> {
        let text = serde_json::to_string_pretty(value).context("failed to serialize tool output")?;
        Ok(Self::text(text))
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the MCP server.
#[derive(Debug, Clone, Default)]
pub struct McpServerConfig {
    /// Directory of recipe JSON files. Without one the catalog is empty and
    /// tools only work on recipes passed inline.
    pub catalog_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Server main loop
// ---------------------------------------------------------------------------

/// Load the catalog and run the MCP server on stdin/stdout until EOF.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or stdio fails fatally.
pub fn run_mcp_server(config: McpServerConfig) -> Result<()> {
    let catalog = match &config.catalog_dir {
        Some(dir) => RecipeCatalog::load(dir)
            .with_context(|| format!("failed to load recipe catalog from {}", dir.display()))?,
        None => RecipeCatalog::default(),
    };

    info!(
        catalog = ?config.catalog_dir,
        recipes = catalog.len(),
        "pantry-match MCP server starting"
    );

    let router = ToolRouter::new(catalog);
    let stdin = std::io::stdin();
    serve(&router, stdin.lock(), std::io::stdout().lock())?;

    info!("pantry-match MCP server stopped");
    Ok(())
}

/// Serve newline-delimited JSON-RPC from `reader` to `writer` until EOF.
pub fn serve(router: &ToolRouter, mut reader: impl BufRead, mut writer: impl Write) -> Result<()> {
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = match read_line_limited(&mut reader, &mut line, MAX_LINE_BYTES) {
            Ok(0) => {
                info!("input closed, shutting down");
                return Ok(());
            }
            Ok(n) => n,
            Err(LineError::TooLong) => {
                warn!(max = MAX_LINE_BYTES, "request line too long, discarded");
                let resp = error_response(
                    None,
                    INVALID_REQUEST,
                    &format!("request exceeds maximum size ({MAX_LINE_BYTES} bytes)"),
                );
                write_response(&mut writer, &resp)?;
                continue;
            }
            Err(LineError::Io(e)) => return Err(e).context("failed to read request"),
        };
        debug!(bytes = read, "read request line");

        let Ok(text) = std::str::from_utf8(&line) else {
            warn!("non-UTF-8 request line");
            write_response(
                &mut writer,
                &error_response(None, PARSE_ERROR, "parse error: request is not UTF-8"),
            )?;
            continue;
        };

        if let Some(resp) = handle_line(router, text) {
            write_response(&mut writer, &resp)?;
        }
    }
}

/// Handle one raw request line. Returns `None` for blank lines and
/// notifications, which get no response.
pub fn handle_line(router: &ToolRouter, line: &str) -> Option<JsonRpcResponse> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    debug!(raw = trimmed, "received request");

    let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "invalid JSON-RPC request");
            return Some(error_response(None, PARSE_ERROR, &format!("parse error: {e}")));
        }
    };

    if request.jsonrpc != "2.0" {
        warn!(version = request.jsonrpc, "invalid JSON-RPC version");
        return Some(error_response(
            request.id.clone(),
            INVALID_REQUEST,
            &format!(
                "invalid request: jsonrpc version must be \"2.0\", got \"{}\"",
                request.jsonrpc
            ),
        ));
    }

    let response = dispatch(router, &request);

    if request.id.is_none() {
        debug!(method = request.method, "notification handled (no response)");
        return None;
    }

    response
}

/// Dispatch a JSON-RPC request to the appropriate handler.
pub fn dispatch(router: &ToolRouter, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => Some(handle_initialize(req)),
        "notifications/initialized" => {
            info!("client initialized");
            None
        }
        "tools/list" => Some(success_response(
            req.id.clone(),
            &ToolsListResult {
                tools: router.list_tools(),
            },
        )),
        "tools/call" => Some(handle_tools_call(router, req)),
        "ping" => Some(success_response(req.id.clone(), &serde_json::json!({}))),
        _ => {
            warn!(method = req.method, "unknown method");
            Some(error_response(
                req.id.clone(),
                METHOD_NOT_FOUND,
                &format!("method not found: {}", req.method),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_initialize(req: &JsonRpcRequest) -> JsonRpcResponse {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION,
        capabilities: serde_json::json!({ "tools": { "listChanged": false } }),
        server_info: ServerInfo {
            name: "pantry-match",
            version: env!("CARGO_PKG_VERSION"),
        },
    };

    success_response(req.id.clone(), &result)
}

fn handle_tools_call(router: &ToolRouter, req: &JsonRpcRequest) -> JsonRpcResponse {
    let params: ToolCallParams = match serde_json::from_value(req.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return error_response(
                req.id.clone(),
                INVALID_PARAMS,
                &format!("invalid tools/call params: {e}"),
            );
        }
    };

    let result = router.call_tool(&params.name, params.arguments).unwrap_or_else(|e| {
        error!(tool = params.name, error = %e, "tool call failed");
        ToolCallResult::error(format!("{e:#}"))
    });
    success_response(req.id.clone(), &result)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn success_response(id: Option<serde_json::Value>, result: &impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse {
            jsonrpc: "2.0".to_owned(),
            id,
            result: Some(v),
            error: None,
        },
        Err(e) => {
            error!(error = %e, "failed to serialize success response");
            error_response(
                id,
                INTERNAL_ERROR,
                &format!("internal error: failed to serialize result: {e}"),
            )
        }
    }
}

fn error_response(id: Option<serde_json::Value>, code: i64, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_owned(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_owned(),
            data: None,
        }),
    }
}

/// Write a JSON-RPC response as a single line.
fn write_response(out: &mut impl Write, resp: &JsonRpcResponse) -> Result<()> {
    let json = serde_json::to_string(resp).context("failed to serialize response")?;
    debug!(response = json, "sending response");
    out.write_all(json.as_bytes())
        .context("failed to write response")?;
    out.write_all(b"\n").context("failed to write newline")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

#[derive(Debug)]
enum LineError {
    TooLong,
    Io(std::io::Error),
}

/// Read one line into `buf`, newline included, capped at `max_bytes`.
///
/// Returns the number of bytes read (0 = EOF). An over-long line is consumed
/// through its newline and reported as [`LineError::TooLong`], leaving the
/// reader positioned at the next request.
fn read_line_limited(
    reader: &mut impl BufRead,
    buf: &mut Vec<u8>,
    max_bytes: usize,
) -> std::result::Result<usize, LineError> {
    let mut total = 0usize;
    let mut too_long = false;
    loop {
        let available = reader.fill_buf().map_err(LineError::Io)?;
        if available.is_empty() {
            break;
        }
        let (take, done) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };
        if !too_long && total + take <= max_bytes {
            buf.extend_from_slice(&available[..take]);
        } else {
            too_long = true;
        }
        total += take;
        reader.consume(take);
        if done {
            break;
        }
    }
    if too_long {
        buf.clear();
        return Err(LineError::TooLong);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line_limited_splits_lines() {
        let mut input = std::io::Cursor::new(b"{\"a\":1}\n{\"b\":2}\n".to_vec());
        let mut buf = Vec::new();
        assert_eq!(read_line_limited(&mut input, &mut buf, 64).expect("line"), 8);
        assert_eq!(buf, b"{\"a\":1}\n");
        buf.clear();
        assert_eq!(read_line_limited(&mut input, &mut buf, 64).expect("line"), 8);
        buf.clear();
        assert_eq!(read_line_limited(&mut input, &mut buf, 64).expect("eof"), 0);
    }

    #[test]
    fn test_read_line_limited_skips_oversized_line() {
        let mut input = std::io::Cursor::new(b"0123456789\nok\n".to_vec());
        let mut buf = Vec::new();
        assert!(matches!(
            read_line_limited(&mut input, &mut buf, 4),
            Err(LineError::TooLong)
        ));
        assert!(buf.is_empty());
        assert_eq!(read_line_limited(&mut input, &mut buf, 4).expect("line"), 3);
        assert_eq!(buf, b"ok\n");
    }

    #[test]
    fn test_handle_line_blank_and_notification() {
        let router = ToolRouter::new(RecipeCatalog::default());
        assert!(handle_line(&router, "   ").is_none());
        assert!(
            handle_line(
                &router,
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#
            )
            .is_none()
        );
    }

    #[test]
    fn test_handle_line_bad_version() {
        let router = ToolRouter::new(RecipeCatalog::default());
        let resp = handle_line(&router, r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#)
            .expect("response");
        assert_eq!(resp.error.expect("error").code, INVALID_REQUEST);
    }
}
