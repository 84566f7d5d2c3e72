//! Recipe records: shaped, shapeless, furnace, and brewing.
//!
//! Ingredient references come in several spellings that all collapse into a
//! [`RecipeKey`]:
//!
//! - `"ns:item"` or `{"item": "ns:item"}` - a plain item, data value 0;
//! - `"item:3"` - the data value folded into the name;
//! - `"ns:mob_spawn_egg"` - the explicit spawn-egg form, normalized to the
//!   generic `minecraft:spawn_egg` item parameterized by the actor id;
//! - `{"item": "minecraft:spawn_egg", "data": "q.get_actor_info_id('ns:mob')"}`
//!   - the actor-info query form, only legal on the generic spawn egg.
//!
//! Namespace-less item names are normalized to the `minecraft:` namespace.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::Identifier;
use crate::error::{Warning, Warnings};

/// Anchored form of the actor-info query, for ingredient `data` fields.
static ACTOR_INFO_QUERY_FULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:query|q)\.get_actor_info_id\('([A-Za-z0-9_]+:[A-Za-z0-9_]+)'\)$")
        .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

/// Unanchored form, for scanning loot/trade payload strings.
static ACTOR_INFO_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:query|q)\.get_actor_info_id\('([A-Za-z0-9_]+:[A-Za-z0-9_]+)'\)")
        .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

/// The explicit `<namespace>:<name>_spawn_egg` item form.
static SPAWN_EGG_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[A-Za-z0-9_]+:)?[A-Za-z0-9_]+)_spawn_egg$")
        .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

/// An item name with the data value folded in, e.g. `stone:1`.
static ITEM_WITH_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[A-Za-z0-9_]+:)?[A-Za-z0-9_]+):([1-9][0-9]*)$")
        .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

/// The data half of an ingredient reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientData {
    /// A plain numeric data value (0 when unspecified).
    Value(i64),
    /// A runtime actor-info parameterization naming an entity; only valid
    /// on the generic `minecraft:spawn_egg` item.
    ActorId(Identifier),
}

/// One resolved ingredient or result reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeKey {
    pub item: Identifier,
    pub data: IngredientData,
}

impl RecipeKey {
    /// Parses any of the supported ingredient spellings.
    pub(crate) fn from_json(value: &Value) -> Result<Self, String> {
        let (raw_item, data_field): (String, Option<&Value>) = match value {
            Value::String(text) => (text.clone(), None),
            Value::Object(obj) => {
                let item = obj
                    .get("item")
                    .and_then(Value::as_str)
                    .ok_or_else(|| "ingredient is missing the 'item' string".to_string())?;
                (item.to_string(), obj.get("data"))
            }
            _ => return Err("ingredient should be a string or an object".to_string()),
        };

        if let Some(m) = SPAWN_EGG_ITEM.captures(&raw_item) {
            let actor = normalize(&m[1]);
            return Ok(Self {
                item: Identifier::new("minecraft:spawn_egg"),
                data: IngredientData::ActorId(actor),
            });
        }

        if let Some(m) = ITEM_WITH_DATA.captures(&raw_item) {
            if data_field.is_some() {
                return Err(format!(
                    "ambiguous ingredient '{raw_item}': data value given both in the name and the 'data' property"
                ));
            }
            let data: i64 = m[2].parse().map_err(|_| format!("invalid data value in '{raw_item}'"))?;
            return Ok(Self { item: normalize(&m[1]), data: IngredientData::Value(data) });
        }

        let item = normalize(&raw_item);
        let data = match data_field {
            None => IngredientData::Value(0),
            Some(Value::Number(n)) => {
                IngredientData::Value(n.as_i64().ok_or_else(|| "data value is not an integer".to_string())?)
            }
            Some(Value::String(text)) => {
                if let Some(m) = ACTOR_INFO_QUERY_FULL.captures(text) {
                    if item.as_str() != "minecraft:spawn_egg" {
                        return Err(format!(
                            "actor-info query is only supported for 'minecraft:spawn_egg', not '{item}'"
                        ));
                    }
                    IngredientData::ActorId(Identifier::new(&m[1]))
                } else {
                    IngredientData::Value(
                        text.parse().map_err(|_| format!("invalid ingredient data '{text}'"))?,
                    )
                }
            }
            Some(_) => return Err("ingredient 'data' should be an integer or a query string".to_string()),
        };
        Ok(Self { item, data })
    }

    /// The entity this key parameterizes a spawn egg for, if any.
    pub fn actor(&self) -> Option<&Identifier> {
        match &self.data {
            IngredientData::ActorId(actor) => Some(actor),
            IngredientData::Value(_) => None,
        }
    }

    /// The concrete item identifier: `<ns>:<name>_spawn_egg` for actor
    /// parameterized eggs, the plain item otherwise.
    pub fn true_item(&self) -> Identifier {
        match &self.data {
            IngredientData::ActorId(actor) => actor.spawn_egg_id(),
            IngredientData::Value(_) => self.item.clone(),
        }
    }
}

/// The kind-specific half of a recipe.
#[derive(Debug, Clone)]
pub enum RecipeBody {
    /// Shaped or shapeless crafting. `pattern` is `Some` for shaped recipes
    /// (rows of single-character slot labels, padded to 3x3); shapeless
    /// recipes carry synthesized numeric slot labels and no pattern.
    Crafting { keys: Vec<(String, RecipeKey)>, pattern: Option<Vec<String>> },
    /// Furnace smelting.
    Furnace { input: RecipeKey },
    /// Brewing stand mix.
    Brewing { input: RecipeKey, reagent: RecipeKey },
}

/// One indexed recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub identifier: Identifier,
    /// The produced item.
    pub result: RecipeKey,
    pub body: RecipeBody,
    /// Path relative to the recipes root, used for glob filtering.
    pub path: PathBuf,
}

pub(super) fn parse_recipe(rel: &Path, value: &Value, warnings: &mut Warnings) -> Option<Recipe> {
    let parsed = if let Some(recipe) = value.get("minecraft:recipe_shaped") {
        parse_shaped(recipe)
    } else if let Some(recipe) = value.get("minecraft:recipe_shapeless") {
        parse_shapeless(recipe)
    } else if let Some(recipe) = value.get("minecraft:recipe_furnace") {
        parse_furnace(recipe)
    } else if let Some(recipe) = value.get("minecraft:recipe_brewing_mix") {
        parse_brewing(recipe)
    } else {
        Err("unknown recipe type (expected shaped, shapeless, furnace or brewing_mix)".to_string())
    };

    match parsed {
        Ok((identifier, result, body)) => {
            Some(Recipe { identifier, result, body, path: rel.to_path_buf() })
        }
        Err(reason) => {
            warnings.push(Warning::file(rel, format!("invalid recipe: {reason}")));
            None
        }
    }
}

type ParsedRecipe = (Identifier, RecipeKey, RecipeBody);

fn recipe_identifier(recipe: &Value) -> Result<Identifier, String> {
    recipe
        .get("description")
        .and_then(|d| d.get("identifier"))
        .and_then(Value::as_str)
        .map(Identifier::new)
        .ok_or_else(|| "missing recipe identifier".to_string())
}

fn recipe_result(recipe: &Value) -> Result<RecipeKey, String> {
    let result = recipe.get("result").ok_or_else(|| "missing recipe result".to_string())?;
    let result = match result {
        Value::Array(items) => items.first().ok_or_else(|| "recipe result list is empty".to_string())?,
        other => other,
    };
    RecipeKey::from_json(result)
}

fn parse_shaped(recipe: &Value) -> Result<ParsedRecipe, String> {
    let identifier = recipe_identifier(recipe)?;
    let result = recipe_result(recipe)?;

    let raw_pattern =
        recipe.get("pattern").and_then(Value::as_array).ok_or_else(|| "missing shape pattern".to_string())?;
    if raw_pattern.len() > 3 {
        return Err("shape pattern has more than 3 rows".to_string());
    }
    let mut pattern = Vec::with_capacity(3);
    for row in raw_pattern {
        let row = row.as_str().ok_or_else(|| "shape pattern row is not a string".to_string())?;
        if row.len() > 3 {
            return Err("shape pattern row is wider than 3".to_string());
        }
        pattern.push(format!("{row:<3}"));
    }
    while pattern.len() < 3 {
        pattern.push("   ".to_string());
    }

    let raw_keys =
        recipe.get("key").and_then(Value::as_object).ok_or_else(|| "missing recipe key map".to_string())?;
    let mut keys = Vec::with_capacity(raw_keys.len());
    for (label, ingredient) in raw_keys {
        keys.push((label.clone(), RecipeKey::from_json(ingredient)?));
    }
    for row in &pattern {
        for slot in row.chars().filter(|c| *c != ' ') {
            if !keys.iter().any(|(label, _)| label.chars().next() == Some(slot)) {
                return Err(format!("shape pattern uses the undefined key '{slot}'"));
            }
        }
    }

    Ok((identifier, result, RecipeBody::Crafting { keys, pattern: Some(pattern) }))
}

fn parse_shapeless(recipe: &Value) -> Result<ParsedRecipe, String> {
    let identifier = recipe_identifier(recipe)?;
    let result = recipe_result(recipe)?;

    let ingredients = recipe.get("ingredients").ok_or_else(|| "missing ingredients".to_string())?;
    let ingredients: Vec<&Value> = match ingredients {
        Value::Array(items) => items.iter().collect(),
        single @ Value::Object(_) => vec![single],
        _ => return Err("'ingredients' should be a list".to_string()),
    };

    let mut slots = 0usize;
    let mut keys = Vec::with_capacity(ingredients.len());
    for (index, ingredient) in ingredients.iter().enumerate() {
        // Clamped: anything past the slot limit fails the check below the
        // same way, and absurd counts must not overflow the sum.
        let count = ingredient.get("count").and_then(Value::as_u64).unwrap_or(1).clamp(1, 10) as usize;
        slots = slots.saturating_add(count);
        keys.push((index.to_string(), RecipeKey::from_json(ingredient)?));
    }
    if slots > 9 {
        return Err("shapeless recipes can have at most 9 ingredient slots (counting 'count')".to_string());
    }

    Ok((identifier, result, RecipeBody::Crafting { keys, pattern: None }))
}

fn parse_furnace(recipe: &Value) -> Result<ParsedRecipe, String> {
    let identifier = recipe_identifier(recipe)?;
    let input =
        RecipeKey::from_json(recipe.get("input").ok_or_else(|| "missing furnace input".to_string())?)?;
    let output =
        RecipeKey::from_json(recipe.get("output").ok_or_else(|| "missing furnace output".to_string())?)?;
    Ok((identifier, output, RecipeBody::Furnace { input }))
}

fn parse_brewing(recipe: &Value) -> Result<ParsedRecipe, String> {
    let identifier = recipe_identifier(recipe)?;
    let input =
        RecipeKey::from_json(recipe.get("input").ok_or_else(|| "missing brewing input".to_string())?)?;
    let reagent =
        RecipeKey::from_json(recipe.get("reagent").ok_or_else(|| "missing brewing reagent".to_string())?)?;
    let output =
        RecipeKey::from_json(recipe.get("output").ok_or_else(|| "missing brewing output".to_string())?)?;
    Ok((identifier, output, RecipeBody::Brewing { input, reagent }))
}

fn normalize(raw: &str) -> Identifier {
    if raw.contains(':') {
        Identifier::new(raw)
    } else {
        Identifier::new(format!("minecraft:{raw}"))
    }
}

/// Searches a JSON subtree for an actor-info query payload and returns the
/// entity identifier it names. Used by loot and trade parsing, where the
/// query can be buried in a command or function string.
pub(crate) fn find_actor_query(value: &Value) -> Option<Identifier> {
    match value {
        Value::String(text) => ACTOR_INFO_QUERY.captures(text).map(|m| Identifier::new(&m[1])),
        Value::Array(items) => items.iter().find_map(find_actor_query),
        Value::Object(obj) => obj.values().find_map(find_actor_query),
        _ => None,
    }
}
