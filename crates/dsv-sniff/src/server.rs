//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes delimiter detection over the MCP protocol on stdio, so AI
//! assistants can check pasted or generated tables before using them.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer. It wraps the same core library
//! that the CLI commands use; each `#[tool]` method delegates to
//! `dsv_sniff_core` rather than implementing detection itself.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use dsv_sniff_core::{DetectOptions, DetectionReport, detect, looks_like_csv_filename};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `detect_delimiter` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DetectDelimiterParams {
    /// The delimited text to check.
    pub text: String,
    /// Delimiter to confirm: a single character or comma, semicolon, tab, pipe.
    /// Defaults to the server's configured delimiter.
    pub delimiter: Option<String>,
    /// Required number of delimiters on the header line.
    pub expected_delimiter_count: Option<usize>,
    /// Reject text where another delimiter outnumbers the requested one.
    pub reject_competing: Option<bool>,
}

/// Parameters for the `check_filename` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CheckFilenameParams {
    /// The file name to check.
    pub name: String,
}

/// MCP server exposing delimiter detection to AI assistants.
#[derive(Clone)]
pub struct ProjectServer {
    defaults: DetectOptions,
    max_input_bytes: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a new MCP server instance with default detection options.
    pub fn new() -> Self {
        Self::with_defaults(DetectOptions::default(), None)
    }

    /// Create a server whose tools fall back to `defaults` and reject text
    /// larger than `max_input_bytes`.
    pub fn with_defaults(defaults: DetectOptions, max_input_bytes: Option<usize>) -> Self {
        Self {
            defaults,
            max_input_bytes,
            tool_router: Self::tool_router(),
        }
    }

    fn check_size(&self, text: &str) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Confirm whether text is consistently separated by a delimiter.
    #[tool(
        description = "Check whether text is a delimiter-separated table using the given delimiter on every non-blank line. Returns detected true/false and a rejection reason."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn detect_delimiter(
        &self,
        Parameters(params): Parameters<DetectDelimiterParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "detect_delimiter",
            delimiter = ?params.delimiter,
            "executing MCP tool"
        );
        self.check_size(&params.text)?;

        let mut options = self.defaults.clone();
        if let Some(ref input) = params.delimiter {
            options.delimiter = dsv_sniff_core::parse_delimiter(input).ok_or_else(|| {
                McpError::invalid_params(format!("unsupported delimiter: {input:?}"), None)
            })?;
        }
        if let Some(count) = params.expected_delimiter_count {
            options.expected_delimiter_count = Some(count);
        }
        if let Some(reject) = params.reject_competing {
            options.reject_competing = reject;
        }

        let report = DetectionReport::new(options.delimiter, detect(params.text.as_str(), &options));

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "detect_delimiter",
            detected = report.detected,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Check whether a file name ends in `.csv`.
    #[tool(description = "Check whether a file name ends in .csv (case-insensitive).")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn check_filename(
        &self,
        Parameters(params): Parameters<CheckFilenameParams>,
    ) -> Result<CallToolResult, McpError> {
        let looks_like_csv = looks_like_csv_filename(&params.name);
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "name": params.name,
            "looks_like_csv": looks_like_csv,
        }))
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(tool = "check_filename", looks_like_csv, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use detect_delimiter to confirm a table's delimiter \
                 and check_filename to test a .csv name.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
