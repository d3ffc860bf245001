//! In-memory recipe catalog loaded from JSON files on disk.
//!
//! Stands in for the storage layer: it owns the recipes and applies the
//! dietary / difficulty / cook-time pre-filter before anything is scored.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{MatchError, PantryResult};
use crate::model::{Difficulty, Recipe};

/// Glob selecting recipe files under the catalog directory.
const RECIPE_GLOB: &str = "**/*.json";

/// Compiled-size ceiling for the ingredient alternation regex.
const PREFILTER_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Maximum recursion depth for the catalog directory walker.
const MAX_WALK_DEPTH: usize = 50;

/// A recipe file holds either one recipe or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeFile {
    Many(Vec<Recipe>),
    One(Box<Recipe>),
}

/// Candidate pre-filter applied before matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeFilter {
    /// Dietary flag names (camelCase) that must all be set.
    pub dietary: Vec<String>,
    /// Accepted difficulty levels; empty accepts all.
    pub difficulty: Vec<Difficulty>,
    /// Upper bound on cook time in minutes.
    pub max_cook_time: Option<u32>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let dietary_ok = self
            .dietary
            .iter()
            .all(|flag| recipe.dietary.flag(flag).unwrap_or(false));
        let difficulty_ok =
            self.difficulty.is_empty() || self.difficulty.contains(&recipe.difficulty);
        let cook_time_ok = self.max_cook_time.is_none_or(|max| recipe.cook_time <= max);

        dietary_ok && difficulty_ok && cook_time_ok
    }
}

/// Case-insensitive "recipe ingredient name contains a user ingredient" test.
#[derive(Debug)]
pub enum IngredientPrefilter {
    /// Escaped alternation of every user ingredient.
    Pattern(regex::Regex),
    /// Lowercased user ingredients, used when the alternation is too big
    /// to compile.
    Needles(Vec<String>),
}

impl IngredientPrefilter {
    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(name),
            Self::Needles(needles) => {
                let name = name.to_lowercase();
                needles.iter().any(|n| name.contains(n.as_str()))
            }
        }
    }

    fn mentioned_by(&self, recipe: &Recipe) -> bool {
        recipe.ingredients.iter().any(|i| self.is_match(&i.name))
    }
}

/// Build the pre-filter for `user_ingredients`.
///
/// Returns `None` when there are no user ingredients, meaning no pre-filter.
pub fn ingredient_prefilter<S: AsRef<str>>(
    user_ingredients: &[S],
) -> PantryResult<Option<IngredientPrefilter>> {
    build_prefilter(user_ingredients, PREFILTER_SIZE_LIMIT)
}

fn build_prefilter<S: AsRef<str>>(
    user_ingredients: &[S],
    size_limit: usize,
) -> PantryResult<Option<IngredientPrefilter>> {
    if user_ingredients.is_empty() {
        return Ok(None);
    }
    let alternation = user_ingredients
        .iter()
        .map(|s| regex::escape(s.as_ref().trim()))
        .collect::<Vec<_>>()
        .join("|");
    let built = regex::RegexBuilder::new(&format!("(?:{alternation})"))
        .case_insensitive(true)
        .size_limit(size_limit)
        .build();

    match built {
        Ok(re) => Ok(Some(IngredientPrefilter::Pattern(re))),
        Err(regex::Error::CompiledTooBig(limit)) => {
            debug!(
                ingredients = user_ingredients.len(),
                limit, "ingredient pattern too big, using substring pre-filter"
            );
            let needles = user_ingredients
                .iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect();
            Ok(Some(IngredientPrefilter::Needles(needles)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Ids that are empty or shared by more than one recipe, in load order.
fn suspicious_ids(recipes: &[Recipe]) -> (usize, Vec<&str>) {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut empty = 0;
    for recipe in recipes {
        if recipe.id.is_empty() {
            empty += 1;
        } else if !seen.insert(recipe.id.as_str()) && !duplicates.contains(&recipe.id.as_str()) {
            duplicates.push(recipe.id.as_str());
        }
    }
    (empty, duplicates)
}

/// Recipes held in memory, in load order.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    pub const fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Load every `*.json` file below `dir`, sorted by relative path.
    ///
    /// Hidden entries and symlinks are skipped.
    pub fn load(dir: &Path) -> PantryResult<Self> {
        let glob = globset::Glob::new(RECIPE_GLOB)?.compile_matcher();

        let mut files = Vec::new();
        collect_files(dir, dir, &glob, &mut files, 0)?;
        files.sort();

        let mut recipes = Vec::new();
        for path in &files {
            let text = std::fs::read_to_string(path).map_err(|source| MatchError::CatalogIo {
                path: path.clone(),
                source,
            })?;
            let parsed: RecipeFile =
                serde_json::from_str(&text).map_err(|source| MatchError::CatalogFormat {
                    path: path.clone(),
                    source,
                })?;
            match parsed {
                RecipeFile::Many(many) => recipes.extend(many),
                RecipeFile::One(one) => recipes.push(*one),
            }
        }

        for recipe in &recipes {
            if recipe.servings == 0 {
                warn!(recipe = %recipe.id, "recipe has zero servings and cannot be scaled");
            }
        }

        let (empty_ids, duplicate_ids) = suspicious_ids(&recipes);
        if empty_ids > 0 {
            warn!(count = empty_ids, "recipes without an id cannot be looked up by id");
        }
        for id in duplicate_ids {
            warn!(recipe = %id, "duplicate recipe id; lookups return the first one loaded");
        }

        info!(
            dir = %dir.display(),
            files = files.len(),
            recipes = recipes.len(),
            "recipe catalog loaded"
        );
        Ok(Self { recipes })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: &str) -> PantryResult<&Recipe> {
        self.recipes
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| MatchError::RecipeNotFound { id: id.to_owned() })
    }

    /// Recipes passing `filter` that mention at least one user ingredient.
    ///
    /// With no user ingredients only `filter` applies.
    pub fn candidates<S: AsRef<str>>(
        &self,
        filter: &RecipeFilter,
        user_ingredients: &[S],
    ) -> PantryResult<Vec<&Recipe>> {
        let prefilter = ingredient_prefilter(user_ingredients)?;
        let out: Vec<&Recipe> = self
            .recipes
            .iter()
            .filter(|r| filter.matches(r))
            .filter(|r| prefilter.as_ref().is_none_or(|p| p.mentioned_by(r)))
            .collect();

        debug!(
            total = self.recipes.len(),
            candidates = out.len(),
            "catalog pre-filter applied"
        );
        Ok(out)
    }
}

fn collect_files(
    root: &Path,
    dir: &Path,
    glob: &globset::GlobMatcher,
    files: &mut Vec<PathBuf>,
    depth: usize,
) -> PantryResult<()> {
    if depth > MAX_WALK_DEPTH {
        return Ok(());
    }

    let io_err = |source: std::io::Error| MatchError::CatalogIo {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();

        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'))
        {
            continue;
        }

        // Does not follow symlinks.
        let Ok(ft) = entry.file_type() else {
            continue;
        };

        if ft.is_dir() {
            collect_files(root, &path, glob, files, depth + 1)?;
        } else if ft.is_file()
            && path
                .strip_prefix(root)
                .is_ok_and(|relative| glob.is_match(relative))
        {
            files.push(path);
        }
    }

    Ok(())
}
