//! The cross-reference resolver: relation tables derived from the asset
//! index in one pass.
//!
//! Three relations are keyed by item identifier - which recipes craft it,
//! which entities drop it (through their loot tables), and which entities
//! trade it (through their trade tables) - plus the spawn-egg registry
//! tying the synthetic `<ns>:<name>_spawn_egg` items to their entities.
//!
//! Spawn-egg attribution needs an extra wrinkle: an offer can name the
//! generic `minecraft:spawn_egg` item parameterized at runtime by an
//! actor-info query. When the query names a known entity the offer is
//! attributed to that entity's egg; otherwise it lands in the
//! `unknown_actors` bucket and is surfaced as a warning, never silently
//! dropped.
//!
//! The tables are read-only derived artifacts, rebuilt from scratch every
//! run.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{Warning, Warnings};
use crate::index::{AssetIndex, Identifier, ItemOffer};

/// Derived relation tables over an [`AssetIndex`].
#[derive(Debug, Default)]
pub struct CrossRefs {
    /// Item -> sorted recipe identifiers producing it.
    crafted_by: BTreeMap<Identifier, Vec<Identifier>>,
    /// Item -> entities whose loot tables can drop it.
    dropped_by: BTreeMap<Identifier, BTreeSet<Identifier>>,
    /// Item -> entities whose trade tables offer or accept it.
    traded_by: BTreeMap<Identifier, BTreeSet<Identifier>>,
    /// Spawn-egg item -> owning entity.
    spawn_eggs: BTreeMap<Identifier, Identifier>,
    /// Generic spawn-egg references that could not be attributed.
    unknown_actors: BTreeSet<String>,
}

impl CrossRefs {
    /// Builds the relation tables from the index.
    pub fn build(index: &AssetIndex, warnings: &mut Warnings) -> Self {
        let mut refs = Self::default();

        // Explicit spawn-egg sub-records register the synthetic egg item
        // first, so later attribution can find it.
        for entity in index.entities.values() {
            if entity.spawn_egg.is_some() {
                refs.spawn_eggs.insert(entity.identifier.spawn_egg_id(), entity.identifier.clone());
            }
        }

        for recipe in index.recipes.values() {
            let offer = ItemOffer {
                item: recipe.result.item.clone(),
                actor: recipe.result.actor().cloned(),
            };
            let context = format!("recipe '{}'", recipe.identifier);
            if let Some(output) = refs.resolve_offer(index, &offer, &context, warnings) {
                refs.crafted_by.entry(output).or_default().push(recipe.identifier.clone());
            }
        }
        for recipes in refs.crafted_by.values_mut() {
            recipes.sort();
            recipes.dedup();
        }

        for entity in index.entities.values() {
            for table_ref in &entity.loot_tables {
                let Some(table) = index.loot_tables.get(table_ref) else {
                    warnings.push(Warning::general(format!(
                        "entity '{}' references the missing loot table '{table_ref}'",
                        entity.identifier
                    )));
                    continue;
                };
                let context = format!("loot table '{}'", table.table_path);
                for offer in &table.offers {
                    if let Some(item) = refs.resolve_offer(index, offer, &context, warnings) {
                        refs.dropped_by.entry(item).or_default().insert(entity.identifier.clone());
                    }
                }
            }
            for table_ref in &entity.trade_tables {
                let Some(table) = index.trades.get(table_ref) else {
                    warnings.push(Warning::general(format!(
                        "entity '{}' references the missing trade table '{table_ref}'",
                        entity.identifier
                    )));
                    continue;
                };
                let context = format!("trade table '{}'", table.table_path);
                for offer in table.offers() {
                    if let Some(item) = refs.resolve_offer(index, &offer, &context, warnings) {
                        refs.traded_by.entry(item).or_default().insert(entity.identifier.clone());
                    }
                }
            }
        }

        debug!(
            crafted = refs.crafted_by.len(),
            dropped = refs.dropped_by.len(),
            traded = refs.traded_by.len(),
            spawn_eggs = refs.spawn_eggs.len(),
            unknown_actors = refs.unknown_actors.len(),
            "cross-reference tables built"
        );
        refs
    }

    /// Resolves an offered item to the identifier relations are keyed by.
    ///
    /// Actor-parameterized spawn eggs become the owning entity's egg item;
    /// generic eggs without a resolvable actor go to the unknown bucket and
    /// yield `None`.
    fn resolve_offer(
        &mut self,
        index: &AssetIndex,
        offer: &ItemOffer,
        context: &str,
        warnings: &mut Warnings,
    ) -> Option<Identifier> {
        if let Some(actor) = &offer.actor {
            if index.entities.contains_key(actor) {
                let egg = actor.spawn_egg_id();
                self.spawn_eggs.entry(egg.clone()).or_insert_with(|| actor.clone());
                return Some(egg);
            }
            warnings.push(Warning::general(format!(
                "{context}: spawn egg refers to the unknown actor '{actor}'"
            )));
            self.unknown_actors.insert(format!("{context}: {actor}"));
            return None;
        }
        if offer.item.as_str() == "minecraft:spawn_egg" {
            warnings.push(Warning::general(format!(
                "{context}: generic spawn egg without an actor-info query"
            )));
            self.unknown_actors.insert(format!("{context}: unparameterized spawn egg"));
            return None;
        }
        Some(offer.item.clone())
    }

    /// Recipes producing `item`, identifier-sorted.
    pub fn crafted_by(&self, item: &Identifier) -> &[Identifier] {
        self.crafted_by.get(item).map_or(&[], Vec::as_slice)
    }

    /// Entities that can drop `item`, identifier-sorted.
    pub fn dropped_by(&self, item: &Identifier) -> Vec<&Identifier> {
        self.dropped_by.get(item).map(|set| set.iter().collect()).unwrap_or_default()
    }

    /// Entities that trade `item`, identifier-sorted.
    pub fn traded_by(&self, item: &Identifier) -> Vec<&Identifier> {
        self.traded_by.get(item).map(|set| set.iter().collect()).unwrap_or_default()
    }

    /// All registered spawn eggs: egg item -> owning entity.
    pub fn spawn_eggs(&self) -> &BTreeMap<Identifier, Identifier> {
        &self.spawn_eggs
    }

    /// The entity a spawn-egg item belongs to, if registered.
    pub fn spawn_egg_owner(&self, egg: &Identifier) -> Option<&Identifier> {
        self.spawn_eggs.get(egg)
    }

    /// Generic spawn-egg references that could not be attributed.
    pub fn unknown_actors(&self) -> &BTreeSet<String> {
        &self.unknown_actors
    }

    /// Resolves the player-facing flag for an item-like asset.
    ///
    /// An explicit flag always wins. Without one, anything craftable,
    /// tradable, or droppable is player-facing (those are player-observable
    /// actions); otherwise the kind default applies (items and blocks
    /// default to player-facing, spawn eggs to non-player-facing).
    pub fn player_facing(&self, item: &Identifier, explicit: Option<bool>, kind_default: bool) -> bool {
        if let Some(flag) = explicit {
            return flag;
        }
        if self.crafted_by.contains_key(item)
            || self.dropped_by.contains_key(item)
            || self.traded_by.contains_key(item)
        {
            return true;
        }
        kind_default
    }
}
