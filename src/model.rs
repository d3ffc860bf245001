//! Recipe data model.
//!
//! Recipes are read-only inputs to the matching and scaling code. JSON uses
//! camelCase field names; a recipe id may arrive as either `id` or `_id`.

use serde::{Deserialize, Serialize};

/// One ingredient a recipe lists as needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequirement {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl IngredientRequirement {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
            category: None,
        }
    }
}

/// Per-recipe nutrition facts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Dietary flags carried by a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DietaryInfo {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub nut_free: bool,
    pub keto: bool,
    pub paleo: bool,
}

impl DietaryInfo {
    /// Look up a flag by its camelCase name. Unknown names yield `None`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        let value = match name {
            "vegetarian" => self.vegetarian,
            "vegan" => self.vegan,
            "glutenFree" => self.gluten_free,
            "dairyFree" => self.dairy_free,
            "nutFree" => self.nut_free,
            "keto" => self.keto,
            "paleo" => self.paleo,
            _ => return None,
        };
        Some(value)
    }
}

/// A stored recipe, as handed over by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(alias = "_id", default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub prep_time: u32,
    pub servings: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub ingredients: Vec<IngredientRequirement>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub nutrition: NutritionFacts,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dietary: DietaryInfo,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
}

/// How well one recipe matches a set of user ingredients.
///
/// Always derived from a recipe plus an ingredient list, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_percentage: u8,
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
}

/// A recipe with its [`MatchResult`] merged in, as returned by ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMatch {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(flatten)]
    pub result: MatchResult,
}

impl RecipeMatch {
    pub const fn match_percentage(&self) -> u8 {
        self.result.match_percentage
    }
}
