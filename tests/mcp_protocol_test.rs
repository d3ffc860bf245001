//! MCP protocol integration tests.
//!
//! Drives the JSON-RPC server and the tool router the way a client would,
//! using in-memory input/output and temporary catalog directories.

use pantry_match::catalog::RecipeCatalog;
use pantry_match::tools::ToolRouter;
use serde_json::{Value, json};

fn recipe(id: &str, ingredients: &[&str], dietary: Value, cook_time: u32) -> Value {
    json!({
        "_id": id,
        "title": format!("Recipe {id}"),
        "description": "test",
        "cookTime": cook_time,
        "prepTime": 5,
        "servings": 4,
        "difficulty": "Easy",
        "ingredients": ingredients
            .iter()
            .map(|n| json!({"name": n, "amount": 2, "unit": "cup"}))
            .collect::<Vec<_>>(),
        "instructions": ["cook"],
        "nutrition": {"calories": 400, "protein": 20, "carbs": 40, "fat": 10, "fiber": 6},
        "tags": [],
        "dietary": dietary,
    })
}

fn write_catalog() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("pasta.json"),
        recipe(
            "pasta",
            &["spaghetti", "tomato sauce", "garlic", "parmesan"],
            json!({"vegetarian": true}),
            20,
        )
        .to_string(),
    )
    .expect("write");
    std::fs::create_dir_all(dir.path().join("mains")).expect("mkdir");
    std::fs::write(
        dir.path().join("mains/more.json"),
        json!([
            recipe("stirfry", &["chicken breast", "soy sauce", "garlic"], json!({}), 15),
            recipe("roast", &["whole chicken", "potatoes", "rosemary"], json!({}), 90),
        ])
        .to_string(),
    )
    .expect("write");
    std::fs::write(dir.path().join("notes.txt"), "not a recipe").expect("write");
    std::fs::write(dir.path().join(".hidden.json"), "{").expect("write");
    dir
}

fn router_for(dir: &tempfile::TempDir) -> ToolRouter {
    ToolRouter::new(RecipeCatalog::load(dir.path()).expect("load catalog"))
}

fn tool_json(router: &ToolRouter, name: &str, args: Value) -> Value {
    let result = router.call_tool(name, args).expect("tool call");
    assert!(!result.is_error, "tool error: {}", result.content[0].text);
    serde_json::from_str(&result.content[0].text).expect("tool output is JSON")
}

#[test]
fn test_json_rpc_request_parsing() {
    let req: pantry_match::server::JsonRpcRequest = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {"protocolVersion": "2025-06-18", "capabilities": {}}
    }))
    .expect("should parse initialize request");

    assert_eq!(req.method, "initialize");
    assert_eq!(req.id, Some(json!(1)));
}

#[test]
fn test_serve_session() {
    let router = ToolRouter::new(RecipeCatalog::default());
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        String::new(),
        "not json".to_owned(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 3, "method": "nope"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}).to_string(),
    ]
    .join("\n");

    let mut output = Vec::new();
    pantry_match::server::serve(&router, input.as_bytes(), &mut output).expect("serve");

    let responses: Vec<Value> = String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|l| serde_json::from_str(l).expect("response json"))
        .collect();

    // initialize, parse error, tools/list, method not found, ping
    assert_eq!(responses.len(), 5);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "pantry-match");
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert_eq!(responses[2]["result"]["tools"].as_array().map(Vec::len), Some(3));
    assert_eq!(responses[3]["error"]["code"], -32601);
    assert_eq!(responses[4]["id"], 4);
    assert!(responses[4].get("error").is_none());
}

#[test]
fn test_tool_definitions_complete() {
    let router = ToolRouter::new(RecipeCatalog::default());
    let tools = router.list_tools();

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["match_recipes", "scale_recipe", "detect_ingredients"]);

    for tool in &tools {
        assert!(!tool.description.is_empty(), "tool {} missing description", tool.name);
        assert!(tool.input_schema.is_object(), "tool {} missing input_schema", tool.name);
    }
}

#[test]
fn test_tool_call_unknown() {
    let router = ToolRouter::new(RecipeCatalog::default());
    let result = router.call_tool("nonexistent_tool", json!({})).expect("should not error");
    assert!(result.is_error);
    assert!(result.content[0].text.contains("Unknown tool"));
}

#[test]
fn test_catalog_load_skips_hidden_and_non_json() {
    let dir = write_catalog();
    let catalog = RecipeCatalog::load(dir.path()).expect("load");
    let ids: Vec<&str> = catalog.recipes().iter().map(|r| r.id.as_str()).collect();
    // sorted by path: mains/more.json before pasta.json
    assert_eq!(ids, vec!["stirfry", "roast", "pasta"]);
}

#[test]
fn test_catalog_load_reports_malformed_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("bad.json"), "{\"title\": 3}").expect("write");
    let err = RecipeCatalog::load(dir.path()).expect_err("malformed");
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn test_match_recipes_from_catalog() {
    let dir = write_catalog();
    let router = router_for(&dir);

    let out = tool_json(
        &router,
        "match_recipes",
        json!({"ingredients": "Chicken, garlic, soy sauce"}),
    );
    let recipes = out["recipes"].as_array().expect("recipes array");

    let ids: Vec<&str> = recipes.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec!["stirfry", "roast", "pasta"]);

    assert_eq!(recipes[0]["matchPercentage"], 100);
    assert_eq!(recipes[0]["title"], "Recipe stirfry");
    assert_eq!(recipes[1]["matchPercentage"], 33);
    assert_eq!(recipes[1]["missingIngredients"], json!(["potatoes", "rosemary"]));
    assert_eq!(recipes[2]["matchPercentage"], 25);
    assert_eq!(recipes[2]["matchedIngredients"], json!(["garlic"]));
}

#[test]
fn test_match_recipes_applies_filters() {
    let dir = write_catalog();
    let router = router_for(&dir);

    let out = tool_json(
        &router,
        "match_recipes",
        json!({
            "ingredients": ["garlic"],
            "filters": {"dietary": ["vegetarian"], "maxCookTime": 30}
        }),
    );
    let recipes = out["recipes"].as_array().expect("recipes array");
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["id"], "pasta");

    let out = tool_json(
        &router,
        "match_recipes",
        json!({"ingredients": ["garlic"], "filters": {"difficulty": ["Hard"]}}),
    );
    assert_eq!(out["recipes"], json!([]));
}

#[test]
fn test_match_recipes_inline_candidates() {
    let router = ToolRouter::new(RecipeCatalog::default());
    let out = tool_json(
        &router,
        "match_recipes",
        json!({
            "ingredients": ["chicken", "oil", "onion"],
            "recipes": [
                recipe("a", &["rice", "saffron"], json!({}), 10),
                recipe("b", &["chicken breast", "olive oil", "garlic"], json!({}), 10),
                recipe("c", &["beef"], json!({}), 10),
            ]
        }),
    );
    let recipes = out["recipes"].as_array().expect("recipes array");
    let ids: Vec<&str> = recipes.iter().filter_map(|r| r["id"].as_str()).collect();
    // a and c both score 0 and keep their input order
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(recipes[0]["matchPercentage"], 67);
}

#[test]
fn test_match_recipes_invalid_params() {
    let router = ToolRouter::new(RecipeCatalog::default());
    assert!(router.call_tool("match_recipes", json!({"ingredients": 5})).is_err());
}

#[test]
fn test_scale_recipe_from_catalog() {
    let dir = write_catalog();
    let router = router_for(&dir);

    let out = tool_json(&router, "scale_recipe", json!({"recipeId": "pasta", "servings": 2}));
    assert_eq!(out["servings"], 2);
    assert_eq!(out["ingredients"][0]["amount"], 1.0);
    assert_eq!(out["ingredients"][0]["name"], "spaghetti");
    assert_eq!(out["nutrition"]["calories"], 200.0);
    assert_eq!(out["nutrition"]["fiber"], 3.0);
    assert!(out["nutrition"].get("sugar").is_none());
}

#[test]
fn test_scale_recipe_clamps_servings() {
    let dir = write_catalog();
    let router = router_for(&dir);

    let out = tool_json(&router, "scale_recipe", json!({"recipeId": "pasta", "servings": -2}));
    assert_eq!(out["servings"], 1);
    assert_eq!(out["ingredients"][0]["amount"], 0.5);
}

#[test]
fn test_scale_recipe_unknown_id() {
    let dir = write_catalog();
    let router = router_for(&dir);

    let result = router
        .call_tool("scale_recipe", json!({"recipeId": "missing", "servings": 2}))
        .expect("tool result");
    assert!(result.is_error);
    assert!(result.content[0].text.contains("recipe not found"));
}

#[test]
fn test_detect_ingredients() {
    let router = ToolRouter::new(RecipeCatalog::default());
    let out = tool_json(
        &router,
        "detect_ingredients",
        json!({"labels": [
            {"description": "Kitchen", "score": 0.7},
            {"description": "Tomato", "score": 0.95},
            {"description": "Leaf vegetable", "score": 0.6},
        ]}),
    );
    assert_eq!(out["ingredients"], json!(["tomato", "leaf vegetable"]));
    assert_eq!(out["labels"].as_array().map(Vec::len), Some(2));
}
