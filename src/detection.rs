//! Post-processing of image labels from an upstream vision service.
//!
//! The service call is not made here. Labels it returns are filtered down to
//! likely food items and turned into plain ingredient names, which the match
//! engine treats exactly like typed input.

use serde::{Deserialize, Serialize};

use crate::matching::normalize_ingredient;

/// Label descriptions containing any of these are kept regardless of score.
const FOOD_KEYWORDS: &[&str] = &[
    "food",
    "ingredient",
    "vegetable",
    "fruit",
    "meat",
    "dairy",
    "grain",
    "spice",
    "herb",
    "seafood",
    "poultry",
    "produce",
];

/// Labels scoring above this are kept even without a food keyword.
const CONFIDENT_SCORE: f64 = 0.85;

/// Maximum number of labels passed on.
const MAX_LABELS: usize = 10;

/// One label from image label detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLabel {
    pub description: String,
    #[serde(default)]
    pub score: f64,
}

fn is_food_label(label: &DetectedLabel) -> bool {
    let description = label.description.to_lowercase();
    FOOD_KEYWORDS.iter().any(|k| description.contains(k)) || label.score > CONFIDENT_SCORE
}

/// Keep food-like or high-confidence labels, in input order, at most 10.
pub fn filter_food_labels(labels: &[DetectedLabel]) -> Vec<DetectedLabel> {
    labels
        .iter()
        .filter(|l| is_food_label(l))
        .take(MAX_LABELS)
        .cloned()
        .collect()
}

/// Normalized ingredient names from labels, empties and repeats dropped.
pub fn labels_to_ingredients(labels: &[DetectedLabel]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let name = normalize_ingredient(&label.description);
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
