//! Detect tool: turn vision-service labels into ingredient names.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::detection::{DetectedLabel, filter_food_labels, labels_to_ingredients};
use crate::server::{ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
pub struct DetectParams {
    pub labels: Vec<DetectedLabel>,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub labels: Vec<DetectedLabel>,
    pub ingredients: Vec<String>,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "detect_ingredients".to_owned(),
        description: "Filter image labels from a vision service down to likely food items \
            (food keywords or score above 0.85, at most 10) and return them as ingredient names \
            ready for match_recipes."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "labels": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "description": { "type": "string" },
                            "score": { "type": "number", "minimum": 0, "maximum": 1 }
                        },
                        "required": ["description"]
                    }
                }
            },
            "required": ["labels"]
        }),
    }
}

pub fn execute(arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: DetectParams =
        serde_json::from_value(arguments).context("invalid detect_ingredients parameters")?;

    let labels = filter_food_labels(&params.labels);
    let ingredients = labels_to_ingredients(&labels);

    ToolCallResult::json(&DetectResponse {
        labels,
        ingredients,
    })
}
