//! Scale tool: ingredient amounts and nutrition for a requested serving count.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::catalog::RecipeCatalog;
use crate::model::Recipe;
use crate::scaling::scale_recipe;
use crate::server::{ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleParams {
    /// Id of a catalog recipe.
    #[serde(default)]
    pub recipe_id: Option<String>,
    /// Inline recipe, used when no id is given.
    #[serde(default)]
    pub recipe: Option<Box<Recipe>>,
    /// Requested serving count.
    pub servings: i64,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "scale_recipe".to_owned(),
        description: "Rescale a recipe's ingredient amounts and nutrition facts to a serving count. \
            Amounts round to 2 decimals, calories to whole numbers, other nutrition to 1 decimal."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "recipeId": {
                    "type": "string",
                    "description": "Id of a recipe in the loaded catalog"
                },
                "recipe": {
                    "type": "object",
                    "description": "Inline recipe (used when recipeId is absent)"
                },
                "servings": {
                    "type": "integer",
                    "description": "Requested servings (values below 1 are raised to 1)",
                    "minimum": 1
                }
            },
            "required": ["servings"]
        }),
    }
}

/// Requested servings below 1 are raised to 1 here, not in the scaler.
fn clamp_servings(requested: i64) -> u32 {
    u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
}

pub fn execute(catalog: &RecipeCatalog, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: ScaleParams =
        serde_json::from_value(arguments).context("invalid scale_recipe parameters")?;

    let recipe: &Recipe = match (&params.recipe_id, &params.recipe) {
        (Some(id), _) => match catalog.get(id) {
            Ok(r) => r,
            Err(e) => return Ok(ToolCallResult::error(e)),
        },
        (None, Some(inline)) => &**inline,
        (None, None) => {
            return Ok(ToolCallResult::error("either recipeId or recipe is required"));
        }
    };

    let servings = clamp_servings(params.servings);
    if i64::from(servings) != params.servings {
        debug!(requested = params.servings, servings, "requested servings clamped");
    }

    match scale_recipe(recipe, servings) {
        Ok(scaled) => ToolCallResult::json(&scaled),
        Err(e) => Ok(ToolCallResult::error(e)),
    }
}
