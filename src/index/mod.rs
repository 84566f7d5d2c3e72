//! The Asset Index: typed, identifier-keyed stores built from one scan of
//! the pack directories.
//!
//! [`AssetIndex::scan`] walks the behavior pack's JSON asset kinds
//! (entities, items, blocks, recipes, loot tables, trade tables, features,
//! feature rules) and the
//! resource pack's sound definitions manifest, parses each file at its
//! fixed schema path, and inserts the extracted record into the store for
//! its kind. A malformed file is a per-file warning and is skipped; an
//! entirely absent kind is an empty store. Nothing in the index is mutated
//! after the scan completes.
//!
//! Identifier uniqueness holds within each kind: an item and an entity may
//! share an identifier without conflict, which is why each kind keeps its
//! own map rather than sharing a composite-keyed store.

mod entity;
mod feature;
mod item;
mod loot;
mod recipe;
mod sound;
mod trade;

pub use entity::{Entity, EntityCategory, SpawnEgg};
pub use feature::{Feature, FeatureRule};
pub use item::ItemRecord;
pub use loot::{ItemOffer, LootTable};
pub use recipe::{IngredientData, Recipe, RecipeBody, RecipeKey};
pub use trade::{OfferItem, OfferSide, TradeGroup, TradeOffer, TradeTable, TradeTier};

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::GeneratorConfig;
use crate::error::{Warning, Warnings};

/// A namespaced asset identifier of the form `namespace:name`.
///
/// The primary key for every asset kind. Ordering is plain lexicographic
/// string order, which is what report sorting relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Wraps an identifier string as written in the asset file.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The part before the first `:`, or `""` for namespace-less ids.
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map_or("", |(ns, _)| ns)
    }

    /// The part after the first `:`, or the whole id when there is none.
    pub fn name(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, name)| name)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for identifiers in the vanilla `minecraft:` namespace.
    pub fn is_vanilla(&self) -> bool {
        self.namespace() == "minecraft"
    }

    /// The conventional spawn-egg item identifier for this entity:
    /// `<namespace>:<name>_spawn_egg`.
    pub fn spawn_egg_id(&self) -> Identifier {
        Identifier(format!("{}_spawn_egg", self.0))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for Identifier {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::borrow::Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// All indexed assets for one generator run.
#[derive(Debug, Default)]
pub struct AssetIndex {
    /// Entities keyed by identifier.
    pub entities: BTreeMap<Identifier, Entity>,
    /// Items keyed by identifier.
    pub items: BTreeMap<Identifier, ItemRecord>,
    /// Blocks keyed by identifier (same record shape as items).
    pub blocks: BTreeMap<Identifier, ItemRecord>,
    /// Recipes keyed by recipe identifier.
    pub recipes: BTreeMap<Identifier, Recipe>,
    /// Loot tables keyed by pack-relative table path (`loot_tables/...`).
    pub loot_tables: BTreeMap<String, LootTable>,
    /// Trade tables keyed by pack-relative table path (`trading/...`).
    pub trades: BTreeMap<String, TradeTable>,
    /// World-generation features keyed by identifier.
    pub features: BTreeMap<Identifier, Feature>,
    /// Feature rules keyed by identifier.
    pub feature_rules: BTreeMap<Identifier, FeatureRule>,
    /// Sound definitions: sound identifier -> ordered audio file paths.
    pub sounds: BTreeMap<String, Vec<String>>,
}

impl AssetIndex {
    /// Scans the pack directories and builds the index.
    ///
    /// Per-file parse failures are recorded on `warnings` and the file is
    /// skipped; the scan itself always completes.
    pub fn scan(config: &GeneratorConfig, warnings: &mut Warnings) -> Self {
        let mut index = Self::default();

        for (rel, value) in load_json_files(&config.bp_path.join("entities"), warnings) {
            if let Some(entity) = entity::parse_entity(&rel, &value, warnings) {
                insert_unique(&mut index.entities, entity.identifier.clone(), entity, "entity", &rel, warnings);
            }
        }
        for (rel, value) in load_json_files(&config.bp_path.join("items"), warnings) {
            if let Some(item) = item::parse_item(&rel, &value, warnings) {
                insert_unique(&mut index.items, item.identifier.clone(), item, "item", &rel, warnings);
            }
        }
        for (rel, value) in load_json_files(&config.bp_path.join("blocks"), warnings) {
            if let Some(block) = item::parse_block(&rel, &value, warnings) {
                insert_unique(&mut index.blocks, block.identifier.clone(), block, "block", &rel, warnings);
            }
        }
        for (rel, value) in load_json_files(&config.bp_path.join("recipes"), warnings) {
            if let Some(recipe) = recipe::parse_recipe(&rel, &value, warnings) {
                insert_unique(&mut index.recipes, recipe.identifier.clone(), recipe, "recipe", &rel, warnings);
            }
        }
        for (rel, value) in load_json_files(&config.bp_path.join("loot_tables"), warnings) {
            let table = loot::parse_loot_table(&rel, &value);
            index.loot_tables.insert(table.table_path.clone(), table);
        }
        for (rel, value) in load_json_files(&config.bp_path.join("trading"), warnings) {
            let table = trade::parse_trade_table(&rel, &value, warnings);
            index.trades.insert(table.table_path.clone(), table);
        }
        for (rel, value) in load_json_files(&config.bp_path.join("features"), warnings) {
            if let Some(feature) = feature::parse_feature(&rel, &value, warnings) {
                insert_unique(&mut index.features, feature.identifier.clone(), feature, "feature", &rel, warnings);
            }
        }
        for (rel, value) in load_json_files(&config.bp_path.join("feature_rules"), warnings) {
            if let Some(rule) = feature::parse_feature_rule(&rel, &value, warnings) {
                insert_unique(&mut index.feature_rules, rule.identifier.clone(), rule, "feature rule", &rel, warnings);
            }
        }

        let sounds_manifest = config.sound_definitions_path();
        if sounds_manifest.is_file() {
            match read_json(&sounds_manifest) {
                Ok(value) => index.sounds = sound::parse_sound_definitions(&value, warnings),
                Err(reason) => warnings.push(Warning::file(&sounds_manifest, reason)),
            }
        }

        debug!(
            entities = index.entities.len(),
            items = index.items.len(),
            blocks = index.blocks.len(),
            recipes = index.recipes.len(),
            loot_tables = index.loot_tables.len(),
            trades = index.trades.len(),
            features = index.features.len(),
            feature_rules = index.feature_rules.len(),
            sounds = index.sounds.len(),
            "asset scan complete"
        );
        index
    }
}

/// Reads and parses every `.json` file under `base`, in sorted path order.
///
/// Returned paths are relative to `base`. Unreadable or unparsable files
/// are warnings, not errors.
fn load_json_files(base: &Path, warnings: &mut Warnings) -> Vec<(PathBuf, Value)> {
    if !base.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(base)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .filter_map(|e| e.path().strip_prefix(base).ok().map(Path::to_path_buf))
        .collect();
    files.sort();

    let mut parsed = Vec::with_capacity(files.len());
    for rel in files {
        let full = base.join(&rel);
        match read_json(&full) {
            Ok(value) => parsed.push((rel, value)),
            Err(reason) => warnings.push(Warning::file(&full, reason)),
        }
    }
    parsed
}

fn read_json(path: &Path) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("cannot read file: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {e}"))
}

fn insert_unique<T>(
    map: &mut BTreeMap<Identifier, T>,
    id: Identifier,
    record: T,
    kind: &str,
    rel: &Path,
    warnings: &mut Warnings,
) {
    if map.contains_key(&id) {
        warnings.push(Warning::file(rel, format!("duplicate {kind} identifier '{id}', keeping the first")));
    } else {
        map.insert(id, record);
    }
}

/// Walks a fixed key path into a JSON value.
pub(crate) fn walk<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(key))
}

/// Extracts a description field: a single string or an ordered list of
/// strings, both yielding the same line list.
pub(crate) fn description_lines(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::String(text) => Ok(text.split('\n').map(str::to_string).collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(line) => Ok(line.clone()),
                _ => Err("description should be a string or a list of strings".to_string()),
            })
            .collect(),
        _ => Err("description should be a string or a list of strings".to_string()),
    }
}

/// Converts a kind-relative path to the forward-slash pack-relative form
/// used by table references (for example `loot_tables/entities/boss.json`).
pub(crate) fn table_path(kind_dir: &str, rel: &Path) -> String {
    format!("{kind_dir}/{}", rel.to_string_lossy().replace('\\', "/"))
}
