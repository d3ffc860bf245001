//! Matching and scaling behavior through the public API.

use pantry_match::matching::levenshtein::similar;
use pantry_match::{
    IngredientRequirement, NutritionFacts, Recipe, match_recipe, rank_recipes, scale_ingredients,
    scale_nutrition,
};

fn recipe(id: &str, names: &[&str]) -> Recipe {
    Recipe {
        id: id.to_owned(),
        title: id.to_owned(),
        description: String::new(),
        image_url: None,
        cook_time: 10,
        prep_time: 5,
        servings: 4,
        difficulty: pantry_match::model::Difficulty::Easy,
        ingredients: names
            .iter()
            .map(|n| IngredientRequirement::new(*n, 1.0, "cup"))
            .collect(),
        instructions: Vec::new(),
        nutrition: NutritionFacts::default(),
        tags: Vec::new(),
        dietary: pantry_match::model::DietaryInfo::default(),
        average_rating: 0.0,
        total_ratings: 0,
    }
}

#[test]
fn test_similarity_is_symmetric_over_ingredient_names() {
    let names = [
        "salt", "sea salt", "butter", "peanut butter", "buttermilk", "milk", "flour",
        "all-purpose flour", "chilli", "chili", "courgette", "zucchini", "",
    ];
    for a in names {
        for b in names {
            for t in [0.5, 0.7, 0.85] {
                assert_eq!(similar(a, b, t), similar(b, a, t), "{a:?} / {b:?} @ {t}");
            }
        }
    }
    assert!(similar("", "", 1.0));
    assert!(similar("", "", 0.0));
}

#[test]
fn test_matched_and_missing_partition_requirements() {
    let r = recipe(
        "cake",
        &["Flour", "sugar", "eggs", "butter", "baking powder", "milk", "vanilla"],
    );
    let pantries: [&[&str]; 4] = [
        &["flour", "milk"],
        &["EGG", "powder", "vanila"],
        &[],
        &["bread", "cheese"],
    ];
    for pantry in pantries {
        let result = match_recipe(&r, pantry);
        assert_eq!(
            result.matched_ingredients.len() + result.missing_ingredients.len(),
            r.ingredients.len()
        );
        for ingredient in &r.ingredients {
            let name = ingredient.name.to_lowercase();
            let in_matched = result.matched_ingredients.contains(&name);
            let in_missing = result.missing_ingredients.contains(&name);
            assert!(in_matched != in_missing, "{name} in both or neither");
        }
    }
}

#[test]
fn test_ranking_keeps_ties_in_input_order() {
    // A and B score 50, C scores 100.
    let a = recipe("A", &["pasta", "clams"]);
    let b = recipe("B", &["pasta", "pesto"]);
    let c = recipe("C", &["pasta", "butter"]);
    let ranked = rank_recipes([&a, &b, &c], &["pasta", "butter"]);

    let ids: Vec<&str> = ranked.iter().map(|m| m.recipe.id.as_str()).collect();
    assert_eq!(ids, vec!["C", "A", "B"]);
    assert_eq!(ranked[1].result.match_percentage, 50);
    assert_eq!(ranked[2].result.match_percentage, 50);
}

#[test]
fn test_ranking_many_ties_is_stable() {
    let recipes: Vec<Recipe> = (0..20)
        .map(|i| recipe(&format!("r{i}"), if i % 3 == 0 { &["rice"] } else { &["beef"] }))
        .collect();
    let ranked = rank_recipes(&recipes, &["rice"]);

    let ids: Vec<String> = ranked.iter().map(|m| m.recipe.id.clone()).collect();
    let mut expected: Vec<String> = (0..20).filter(|i| i % 3 == 0).map(|i| format!("r{i}")).collect();
    expected.extend((0..20).filter(|i| i % 3 != 0).map(|i| format!("r{i}")));
    assert_eq!(ids, expected);
}

#[test]
fn test_scaling_examples() {
    let xs = vec![IngredientRequirement::new("tomatoes", 2.0, "cup")];
    let half = scale_ingredients(&xs, 4, 2).expect("scale");
    assert!((half[0].amount - 1.0).abs() < f64::EPSILON);

    let n = NutritionFacts {
        calories: 200.0,
        protein: 10.0,
        carbs: 20.0,
        fat: 5.0,
        ..NutritionFacts::default()
    };
    let scaled = scale_nutrition(&n, 2, 5).expect("scale");
    assert!((scaled.calories - 500.0).abs() < f64::EPSILON);
    assert!((scaled.protein - 25.0).abs() < f64::EPSILON);
    assert!((scaled.carbs - 50.0).abs() < f64::EPSILON);
    assert!((scaled.fat - 12.5).abs() < f64::EPSILON);
}

#[test]
fn test_scaling_there_and_back() {
    let xs: Vec<IngredientRequirement> = [0.1, 0.33, 0.5, 1.0, 1.25, 3.14, 250.0]
        .iter()
        .map(|&a| IngredientRequirement::new("x", a, "g"))
        .collect();
    let back = scale_ingredients(&scale_ingredients(&xs, 4, 8).expect("up"), 8, 4).expect("down");
    for (a, b) in xs.iter().zip(&back) {
        assert!((a.amount - b.amount).abs() <= 0.01 + 1e-9, "{} vs {}", a.amount, b.amount);
    }
}
