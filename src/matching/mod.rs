//! Ingredient match engine.
//!
//! Decides, per required ingredient of a recipe, whether any user-supplied
//! ingredient satisfies it, and ranks recipes by the share of satisfied
//! requirements.
//!
//! # Rules
//!
//! Both sides are trimmed and lowercased. A requirement `r` is matched by a
//! user ingredient `u` when any of these hold, checked in order:
//!
//! 1. `r` contains `u`
//! 2. `u` contains `r`
//! 3. [`levenshtein::similar`]`(r, u, 0.7)`
//!
//! An empty user ingredient is contained in every requirement and therefore
//! matches all of them. Use [`parse_ingredient_list`] to strip empties from
//! free-text input.

pub mod levenshtein;

use tracing::{debug, trace};

use crate::model::{MatchResult, Recipe, RecipeMatch};

/// Which rule satisfied a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The requirement name contains the user ingredient.
    RequirementContains,
    /// The user ingredient contains the requirement name.
    IngredientContains,
    /// Edit-distance similarity reached the threshold.
    Fuzzy,
}

/// Trim and lowercase an ingredient name.
pub fn normalize_ingredient(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Split comma-separated free text into normalized ingredient names.
///
/// Empty entries (`"eggs,, milk,"`) are dropped.
pub fn parse_ingredient_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(normalize_ingredient)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Test one normalized requirement against one normalized user ingredient.
pub fn ingredient_matches(requirement: &str, available: &str) -> Option<MatchKind> {
    if requirement.contains(available) {
        Some(MatchKind::RequirementContains)
    } else if available.contains(requirement) {
        Some(MatchKind::IngredientContains)
    } else if levenshtein::similar(requirement, available, levenshtein::DEFAULT_THRESHOLD) {
        Some(MatchKind::Fuzzy)
    } else {
        None
    }
}

/// Compute how well `recipe` matches the user's ingredients.
///
/// Matched and missing names come back normalized, in the recipe's
/// requirement order. Every requirement lands in exactly one of the two.
pub fn match_recipe<S: AsRef<str>>(recipe: &Recipe, user_ingredients: &[S]) -> MatchResult {
    let available: Vec<String> = user_ingredients
        .iter()
        .map(|s| normalize_ingredient(s.as_ref()))
        .collect();
    match_normalized(recipe, &available)
}

fn match_normalized(recipe: &Recipe, available: &[String]) -> MatchResult {
    let mut matched_ingredients = Vec::new();
    let mut missing_ingredients = Vec::new();

    for requirement in &recipe.ingredients {
        let name = normalize_ingredient(&requirement.name);
        let hit = available
            .iter()
            .find_map(|avail| ingredient_matches(&name, avail).map(|kind| (avail, kind)));

        match hit {
            Some((avail, kind)) => {
                trace!(requirement = %name, by = %avail, ?kind, "requirement matched");
                matched_ingredients.push(name);
            }
            None => {
                trace!(requirement = %name, "requirement missing");
                missing_ingredients.push(name);
            }
        }
    }

    let match_percentage = percentage(matched_ingredients.len(), recipe.ingredients.len());

    MatchResult {
        match_percentage,
        matched_ingredients,
        missing_ingredients,
    }
}

/// `round(100 * matched / total)` with halves rounded up, 0 for an empty recipe.
///
/// Integer arithmetic, so 1/8 gives exactly 13 and 1/2 exactly 50.
fn percentage(matched: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * matched + total) / (2 * total);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// Match every recipe against the same ingredients and rank them.
///
/// Sorted by match percentage, highest first. Recipes with equal scores keep
/// their input order.
pub fn rank_recipes<'a, I, S>(recipes: I, user_ingredients: &[S]) -> Vec<RecipeMatch>
where
    I: IntoIterator<Item = &'a Recipe>,
    S: AsRef<str>,
{
    let available: Vec<String> = user_ingredients
        .iter()
        .map(|s| normalize_ingredient(s.as_ref()))
        .collect();

    let mut ranked: Vec<RecipeMatch> = recipes
        .into_iter()
        .map(|recipe| RecipeMatch {
            result: match_normalized(recipe, &available),
            recipe: recipe.clone(),
        })
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.match_percentage().cmp(&a.match_percentage()));

    debug!(
        recipes = ranked.len(),
        ingredients = available.len(),
        top = ?ranked.first().map(RecipeMatch::match_percentage),
        "ranked recipes"
    );

    ranked
}
