//! Serving-size scaling of ingredient amounts and nutrition facts.
//!
//! Everything scales linearly by `new_servings / original_servings`.
//! Ingredient amounts round to 2 decimal places, calories to a whole number,
//! other nutrition facts to 1 decimal place. Inputs are never modified.

use serde::Serialize;
use tracing::debug;

use crate::error::{MatchError, PantryResult};
use crate::model::{IngredientRequirement, NutritionFacts, Recipe};

/// A recipe's ingredients and nutrition rescaled to a serving count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledRecipe {
    pub servings: u32,
    pub ingredients: Vec<IngredientRequirement>,
    pub nutrition: NutritionFacts,
}

/// Scaling ratio. `original_servings` must be at least 1.
///
/// `new_servings` is not clamped: a caller passing 0 gets all-zero amounts.
fn ratio(original_servings: u32, new_servings: u32) -> PantryResult<f64> {
    if original_servings == 0 {
        return Err(MatchError::InvalidServings { servings: 0 });
    }
    Ok(f64::from(new_servings) / f64::from(original_servings))
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Rescale every ingredient amount, rounded to 2 decimal places.
pub fn scale_ingredients(
    ingredients: &[IngredientRequirement],
    original_servings: u32,
    new_servings: u32,
) -> PantryResult<Vec<IngredientRequirement>> {
    let ratio = ratio(original_servings, new_servings)?;

    Ok(ingredients
        .iter()
        .map(|ingredient| IngredientRequirement {
            amount: round_to(ingredient.amount * ratio, 2),
            ..ingredient.clone()
        })
        .collect())
}

/// Rescale nutrition facts.
///
/// Optional facts stay absent when absent; a present zero stays present.
pub fn scale_nutrition(
    nutrition: &NutritionFacts,
    original_servings: u32,
    new_servings: u32,
) -> PantryResult<NutritionFacts> {
    let ratio = ratio(original_servings, new_servings)?;
    let macro_value = |v: f64| round_to(v * ratio, 1);

    Ok(NutritionFacts {
        calories: (nutrition.calories * ratio).round(),
        protein: macro_value(nutrition.protein),
        carbs: macro_value(nutrition.carbs),
        fat: macro_value(nutrition.fat),
        fiber: nutrition.fiber.map(macro_value),
        sugar: nutrition.sugar.map(macro_value),
        sodium: nutrition.sodium.map(macro_value),
    })
}

/// Rescale a whole recipe from its own serving count to `new_servings`.
pub fn scale_recipe(recipe: &Recipe, new_servings: u32) -> PantryResult<ScaledRecipe> {
    debug!(
        recipe = %recipe.id,
        from = recipe.servings,
        to = new_servings,
        "scaling recipe"
    );

    Ok(ScaledRecipe {
        servings: new_servings,
        ingredients: scale_ingredients(&recipe.ingredients, recipe.servings, new_servings)?,
        nutrition: scale_nutrition(&recipe.nutrition, recipe.servings, new_servings)?,
    })
}
