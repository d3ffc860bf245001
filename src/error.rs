//! Error types for the pantry-match crate.

use std::path::PathBuf;

/// Errors raised by the matching core, the scaler and the recipe catalog.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Serving count used as a scaling divisor was zero.
    #[error("invalid servings: {servings} (original servings must be at least 1)")]
    InvalidServings { servings: i64 },

    /// Catalog file or directory could not be read.
    #[error("I/O error on {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a recipe or an array of recipes.
    #[error("malformed recipe file {path}: {source}")]
    CatalogFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No recipe with this id in the catalog.
    #[error("recipe not found: {id}")]
    RecipeNotFound { id: String },

    /// Recipe file glob could not be compiled.
    #[error("invalid recipe glob: {0}")]
    InvalidGlob(#[from] globset::Error),

    /// Ingredient pre-filter pattern could not be compiled.
    #[error("invalid ingredient pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for pantry-match operations.
pub type PantryResult<T> = Result<T, MatchError>;
