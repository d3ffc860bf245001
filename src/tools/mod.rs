//! Tool router: registers and dispatches MCP tool calls.
//!
//! Each tool takes JSON arguments and returns a [`ToolCallResult`] whose text
//! is the JSON payload. The router owns the recipe catalog the tools read.

pub mod detect;
pub mod match_recipes;
pub mod scale_recipe;

use anyhow::Result;
use tracing::debug;

use crate::catalog::RecipeCatalog;
use crate::server::{ToolCallResult, ToolDefinition};

/// Tool router that dispatches MCP tool calls to implementations.
pub struct ToolRouter {
    catalog: RecipeCatalog,
}

impl ToolRouter {
    pub const fn new(catalog: RecipeCatalog) -> Self {
        Self { catalog }
    }

    /// List all available tools with their JSON Schema definitions.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        vec![
            match_recipes::tool_definition(),
            scale_recipe::tool_definition(),
            detect::tool_definition(),
        ]
    }

    /// Call a tool by name with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments do not parse or the tool fails.
    /// Unknown tool names produce an `is_error` result instead.
    pub fn call_tool(&self, name: &str, arguments: serde_json::Value) -> Result<ToolCallResult> {
        debug!(tool = name, "dispatching tool call");

        match name {
            "match_recipes" => match_recipes::execute(&self.catalog, arguments),
            "scale_recipe" => scale_recipe::execute(&self.catalog, arguments),
            "detect_ingredients" => detect::execute(arguments),
            _ => Ok(ToolCallResult::error(format!("Unknown tool: {name}"))),
        }
    }
}
