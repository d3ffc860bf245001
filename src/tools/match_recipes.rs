//! Match tool: rank candidate recipes by how many ingredients the user has.
//!
//! Candidates come from the catalog (after the dietary / difficulty /
//! cook-time filter and the ingredient-name pre-filter) or from an inline
//! `recipes` array, which only gets the filter.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{RecipeCatalog, RecipeFilter};
use crate::matching::{normalize_ingredient, parse_ingredient_list, rank_recipes};
use crate::model::{Recipe, RecipeMatch};
use crate::server::{ToolCallResult, ToolDefinition};

/// User ingredients as a list or as comma-separated text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IngredientInput {
    List(Vec<String>),
    Text(String),
}

impl IngredientInput {
    /// Normalized names with empty entries removed.
    pub fn into_names(self) -> Vec<String> {
        match self {
            Self::List(items) => items
                .iter()
                .map(|s| normalize_ingredient(s))
                .filter(|s| !s.is_empty())
                .collect(),
            Self::Text(text) => parse_ingredient_list(&text),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchParams {
    pub ingredients: IngredientInput,
    #[serde(default)]
    pub filters: RecipeFilter,
    /// Candidate recipes to use instead of the catalog.
    #[serde(default)]
    pub recipes: Option<Vec<Recipe>>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub recipes: Vec<RecipeMatch>,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "match_recipes".to_owned(),
        description: "Rank recipes by how many of their required ingredients the user has. \
            Ingredients match by substring in either direction or by edit-distance similarity. \
            Returns recipes sorted by matchPercentage, highest first."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "ingredients": {
                    "description": "Ingredients on hand: an array of names or comma-separated text",
                    "oneOf": [
                        { "type": "array", "items": { "type": "string" } },
                        { "type": "string" }
                    ]
                },
                "filters": {
                    "type": "object",
                    "properties": {
                        "dietary": {
                            "type": "array",
                            "items": {
                                "type": "string",
                                "enum": ["vegetarian", "vegan", "glutenFree", "dairyFree", "nutFree", "keto", "paleo"]
                            }
                        },
                        "difficulty": {
                            "type": "array",
                            "items": { "type": "string", "enum": ["Easy", "Medium", "Hard"] }
                        },
                        "maxCookTime": { "type": "integer", "minimum": 0 }
                    }
                },
                "recipes": {
                    "type": "array",
                    "description": "Candidate recipes to rank instead of the loaded catalog",
                    "items": { "type": "object" }
                }
            },
            "required": ["ingredients"]
        }),
    }
}

pub fn execute(catalog: &RecipeCatalog, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: MatchParams =
        serde_json::from_value(arguments).context("invalid match_recipes parameters")?;
    let ingredients = params.ingredients.into_names();

    let ranked = match &params.recipes {
        Some(inline) => rank_recipes(
            inline.iter().filter(|r| params.filters.matches(r)),
            &ingredients,
        ),
        None => {
            let candidates = catalog
                .candidates(&params.filters, &ingredients)
                .context("failed to select candidate recipes")?;
            rank_recipes(candidates, &ingredients)
        }
    };

    ToolCallResult::json(&MatchResponse { recipes: ranked })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_input_forms() {
        let list: IngredientInput =
            serde_json::from_value(serde_json::json!([" Eggs", "", "MILK"])).expect("list");
        assert_eq!(list.into_names(), vec!["eggs", "milk"]);

        let text: IngredientInput =
            serde_json::from_value(serde_json::json!("eggs, ,milk")).expect("text");
        assert_eq!(text.into_names(), vec!["eggs", "milk"]);
    }

    #[test]
    fn test_missing_ingredients_is_an_error() {
        let catalog = RecipeCatalog::default();
        assert!(execute(&catalog, serde_json::json!({ "filters": {} })).is_err());
    }
}
