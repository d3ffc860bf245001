//! `pantry-match`: rank recipes by the ingredients a user has on hand.
//!
//! The core is a set of pure functions: a fuzzy ingredient matcher that
//! scores each recipe by the share of its requirements the user can cover,
//! and a linear serving-size scaler for ingredient amounts and nutrition.
//! Around it sit an in-memory recipe catalog and an MCP server (JSON-RPC 2.0
//! over stdio) that exposes the core as tools.
//!
//! # Tools
//!
//! - `match_recipes`: rank catalog or inline recipes against an ingredient list
//! - `scale_recipe`: rescale a recipe to a serving count
//! - `detect_ingredients`: filter vision-service labels into ingredient names
//!
//! # Architecture
//!
//! ```text
//! stdin (JSON-RPC) → server → ToolRouter → tools ─→ matching / scaling / detection
//!                                            ↓
//!                                       RecipeCatalog
//! stdout (JSON-RPC) ←──────────────────────────┘
//! ```

pub mod catalog;
pub mod detection;
pub mod error;
pub mod matching;
pub mod model;
pub mod scaling;
pub mod server;
pub mod tools;

pub use error::{MatchError, PantryResult};
pub use matching::{match_recipe, rank_recipes};
pub use model::{IngredientRequirement, MatchResult, NutritionFacts, Recipe, RecipeMatch};
pub use scaling::{scale_ingredients, scale_nutrition};
pub use server::run_mcp_server;
