//! Entity records and their extraction from behavior pack entity files.
//!
//! The guide-relevant fields live under `minecraft:entity/description`:
//! identifier, free-text description, world locations, the guide category,
//! and an optional spawn-egg sub-record. The entity's components are also
//! inspected for loot-table and trade-table references so the resolver can
//! attribute drops and trades to the owning entity.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{description_lines, walk, Identifier};
use crate::error::{Warning, Warnings};

/// The fixed guide categories an entity can declare.
///
/// The category drives which section of the guide an entity lands in, so a
/// filter over categories always operates on the resolved value: an entity
/// without the field is `Uncategorized`, never "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityCategory {
    Character,
    Trader,
    NonPlayerFacingUtility,
    PlayerFacingUtility,
    Projectile,
    Vehicle,
    Creature,
    Decoration,
    InteractiveEntity,
    BlockEntity,
    /// Assigned when the entity file declares no category.
    Uncategorized,
}

impl EntityCategory {
    /// Every category, including the `uncategorized` default.
    pub const ALL: [EntityCategory; 11] = [
        EntityCategory::Character,
        EntityCategory::Trader,
        EntityCategory::NonPlayerFacingUtility,
        EntityCategory::PlayerFacingUtility,
        EntityCategory::Projectile,
        EntityCategory::Vehicle,
        EntityCategory::Creature,
        EntityCategory::Decoration,
        EntityCategory::InteractiveEntity,
        EntityCategory::BlockEntity,
        EntityCategory::Uncategorized,
    ];

    /// The snake_case form used in entity files and directive arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityCategory::Character => "character",
            EntityCategory::Trader => "trader",
            EntityCategory::NonPlayerFacingUtility => "non_player_facing_utility",
            EntityCategory::PlayerFacingUtility => "player_facing_utility",
            EntityCategory::Projectile => "projectile",
            EntityCategory::Vehicle => "vehicle",
            EntityCategory::Creature => "creature",
            EntityCategory::Decoration => "decoration",
            EntityCategory::InteractiveEntity => "interactive_entity",
            EntityCategory::BlockEntity => "block_entity",
            EntityCategory::Uncategorized => "uncategorized",
        }
    }

    /// Parses the snake_case form; `None` for unknown values.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == raw)
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity's explicit spawn-egg sub-record.
#[derive(Debug, Clone, Default)]
pub struct SpawnEgg {
    /// Description lines for the egg itself.
    pub description: Vec<String>,
    /// Explicit player-facing flag; absent means "infer" (eggs default to
    /// non-player-facing absent other evidence).
    pub player_facing: Option<bool>,
}

/// One indexed entity.
#[derive(Debug, Clone)]
pub struct Entity {
    pub identifier: Identifier,
    pub description: Vec<String>,
    /// World locations as written (`"x y z"` free text, validated numeric).
    pub locations: Vec<String>,
    pub category: EntityCategory,
    pub spawn_egg: Option<SpawnEgg>,
    /// Pack-relative loot table paths referenced by the entity's components.
    pub loot_tables: Vec<String>,
    /// Pack-relative trade table paths referenced by the entity's components.
    pub trade_tables: Vec<String>,
    /// Path relative to the entities root, used for glob filtering.
    pub path: PathBuf,
}

/// Extracts an [`Entity`] from a parsed entity file.
///
/// Returns `None` (with warnings) for files missing the identifier or the
/// description object, and silently for vanilla `minecraft:` entities.
pub(super) fn parse_entity(rel: &Path, value: &Value, warnings: &mut Warnings) -> Option<Entity> {
    let Some(root) = walk(value, &["minecraft:entity", "description"]) else {
        warnings.push(Warning::file(rel, "missing 'minecraft:entity' description object"));
        return None;
    };
    let Some(identifier) = root.get("identifier").and_then(Value::as_str) else {
        warnings.push(Warning::file(rel, "missing entity identifier"));
        return None;
    };
    let identifier = Identifier::new(identifier);
    if identifier.is_vanilla() {
        // Vanilla entities are not part of the documented content.
        return None;
    }

    let description = match root.get("description") {
        None => Vec::new(),
        Some(d) => match description_lines(d) {
            Ok(lines) => lines,
            Err(reason) => {
                warnings.push(Warning::file(rel, format!("invalid entity description: {reason}")));
                Vec::new()
            }
        },
    };

    let category = match root.get("category") {
        None => EntityCategory::Uncategorized,
        Some(Value::String(raw)) => EntityCategory::parse(raw).unwrap_or_else(|| {
            warnings.push(Warning::file(
                rel,
                format!("invalid entity category '{raw}' (assigned 'uncategorized' by default)"),
            ));
            EntityCategory::Uncategorized
        }),
        Some(_) => {
            warnings.push(Warning::file(rel, "entity category should be a string"));
            EntityCategory::Uncategorized
        }
    };

    let mut locations = Vec::new();
    if let Some(raw_locations) = root.get("locations") {
        match raw_locations.as_array() {
            None => warnings.push(Warning::file(rel, "entity locations should be a list of strings")),
            Some(entries) => {
                for entry in entries {
                    match entry.as_str().filter(|s| is_coordinate_triple(s)) {
                        Some(text) => locations.push(text.to_string()),
                        None => warnings.push(Warning::file(
                            rel,
                            "invalid entity location format (expected \"x y z\")",
                        )),
                    }
                }
            }
        }
    }

    let spawn_egg = match root.get("spawn_egg") {
        None => None,
        Some(egg) => Some(parse_spawn_egg(rel, egg, warnings)),
    };

    let mut loot_tables = Vec::new();
    let mut trade_tables = Vec::new();
    if let Some(entity) = value.get("minecraft:entity") {
        if let Some(components) = entity.get("components") {
            collect_table_refs(components, &mut loot_tables, &mut trade_tables);
        }
        if let Some(groups) = entity.get("component_groups").and_then(Value::as_object) {
            for group in groups.values() {
                collect_table_refs(group, &mut loot_tables, &mut trade_tables);
            }
        }
    }
    loot_tables.sort();
    loot_tables.dedup();
    trade_tables.sort();
    trade_tables.dedup();

    Some(Entity {
        identifier,
        description,
        locations,
        category,
        spawn_egg,
        loot_tables,
        trade_tables,
        path: rel.to_path_buf(),
    })
}

fn parse_spawn_egg(rel: &Path, egg: &Value, warnings: &mut Warnings) -> SpawnEgg {
    let description = match egg.get("description") {
        None => Vec::new(),
        Some(d) => match description_lines(d) {
            Ok(lines) => lines,
            Err(reason) => {
                warnings.push(Warning::file(rel, format!("invalid spawn egg description: {reason}")));
                Vec::new()
            }
        },
    };
    let player_facing = match egg.get("player_facing") {
        None => None,
        Some(Value::Bool(flag)) => Some(*flag),
        Some(_) => {
            warnings.push(Warning::file(rel, "spawn egg player_facing should be a boolean"));
            None
        }
    };
    SpawnEgg { description, player_facing }
}

fn collect_table_refs(components: &Value, loot: &mut Vec<String>, trade: &mut Vec<String>) {
    let table_of = |component: &str| {
        components.get(component).and_then(|c| c.get("table")).and_then(Value::as_str).map(str::to_string)
    };
    if let Some(table) = table_of("minecraft:loot") {
        loot.push(table);
    }
    for component in ["minecraft:trade_table", "minecraft:economy_trade_table"] {
        if let Some(table) = table_of(component) {
            trade.push(table);
        }
    }
}

fn is_coordinate_triple(text: &str) -> bool {
    let parts: Vec<&str> = text.split_whitespace().collect();
    parts.len() == 3 && parts.iter().all(|p| p.parse::<f64>().is_ok())
}
