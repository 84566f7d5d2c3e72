//! Item-like reports: items, blocks, and spawn eggs share one record shape
//! and one rendering path.
//!
//! Spawn eggs have no files of their own; their records are synthesized
//! from the resolver's egg registry, borrowing the owning entity's file
//! path for glob filtering and the explicit spawn-egg sub-record (when the
//! entity declares one) for description and player-facing flag.

use super::{bullets_or_placeholder, sections_or_placeholder, table_cell, PlayerFacingSelector, Reports, NO_MATCHING_DATA};
use crate::index::{Identifier, Recipe, RecipeBody};
use crate::pattern::PatternFilter;

/// Which item-like store a report reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Item,
    Block,
    SpawnEgg,
}

impl ItemKind {
    /// The table header label for the kind.
    fn label(self) -> &'static str {
        match self {
            ItemKind::Item => "Item",
            ItemKind::Block => "Block",
            ItemKind::SpawnEgg => "Spawn egg",
        }
    }

    /// The player-facing default when nothing explicit or inferred applies.
    /// Items and blocks exist to be seen; spawn eggs are usually staging
    /// tools unless something puts them in the player's hands.
    fn player_facing_default(self) -> bool {
        !matches!(self, ItemKind::SpawnEgg)
    }
}

struct ItemView {
    identifier: Identifier,
    description: Vec<String>,
}

impl Reports<'_> {
    fn select_items(
        &self,
        kind: ItemKind,
        filter: &PatternFilter,
        selector: PlayerFacingSelector,
    ) -> Vec<ItemView> {
        let mut selected = Vec::new();
        match kind {
            ItemKind::Item | ItemKind::Block => {
                let store = if kind == ItemKind::Item { &self.index.items } else { &self.index.blocks };
                for record in store.values() {
                    if !filter.matches(&record.path) {
                        continue;
                    }
                    let facing = self.refs.player_facing(
                        &record.identifier,
                        record.player_facing,
                        kind.player_facing_default(),
                    );
                    if selector.accepts(facing) {
                        selected.push(ItemView {
                            identifier: record.identifier.clone(),
                            description: record.description.clone(),
                        });
                    }
                }
            }
            ItemKind::SpawnEgg => {
                for (egg, owner) in self.refs.spawn_eggs() {
                    let Some(entity) = self.index.entities.get(owner) else {
                        continue;
                    };
                    if !filter.matches(&entity.path) {
                        continue;
                    }
                    let sub_record = entity.spawn_egg.as_ref();
                    let explicit = sub_record.and_then(|e| e.player_facing);
                    let facing =
                        self.refs.player_facing(egg, explicit, kind.player_facing_default());
                    if selector.accepts(facing) {
                        selected.push(ItemView {
                            identifier: egg.clone(),
                            description: sub_record.map(|e| e.description.clone()).unwrap_or_default(),
                        });
                    }
                }
            }
        }
        selected
    }

    /// `- identifier` bullets for every matching record.
    pub fn list_items(
        &self,
        kind: ItemKind,
        filter: &PatternFilter,
        selector: PlayerFacingSelector,
    ) -> String {
        let lines = self
            .select_items(kind, filter, selector)
            .into_iter()
            .map(|view| view.identifier.to_string())
            .collect();
        bullets_or_placeholder(lines)
    }

    /// One `### identifier` section per record, with description, recipe
    /// subsections, and the dropped-by / traded-by entity lists. Empty
    /// subsections are omitted.
    pub fn summarize_items(
        &self,
        kind: ItemKind,
        filter: &PatternFilter,
        selector: PlayerFacingSelector,
    ) -> String {
        let sections = self
            .select_items(kind, filter, selector)
            .into_iter()
            .map(|view| {
                let mut section = format!("### {}", view.identifier);
                if !view.description.is_empty() {
                    section.push_str("\n\n");
                    section.push_str(&view.description.join("\n"));
                }
                for recipe_id in self.refs.crafted_by(&view.identifier) {
                    if let Some(recipe) = self.index.recipes.get(recipe_id) {
                        section.push_str("\n\n");
                        section.push_str(&render_recipe(recipe));
                    }
                }
                let dropped = self.refs.dropped_by(&view.identifier);
                if !dropped.is_empty() {
                    section.push_str("\n\n#### **Dropped by:**\n");
                    for entity in dropped {
                        section.push_str(&format!("\n- {entity}"));
                    }
                }
                let traded = self.refs.traded_by(&view.identifier);
                if !traded.is_empty() {
                    section.push_str("\n\n#### **Traded by:**\n");
                    for entity in traded {
                        section.push_str(&format!("\n- {entity}"));
                    }
                }
                section
            })
            .collect();
        sections_or_placeholder(sections)
    }

    /// A two-column `| <Kind> | Description |` table over the selection.
    pub fn items_table(
        &self,
        kind: ItemKind,
        filter: &PatternFilter,
        selector: PlayerFacingSelector,
    ) -> String {
        let selected = self.select_items(kind, filter, selector);
        if selected.is_empty() {
            return NO_MATCHING_DATA.to_string();
        }
        let mut table = format!("| {} | Description |\n|---|---|", kind.label());
        for view in selected {
            table.push_str(&format!("\n| {} | {} |", view.identifier, table_cell(&view.description)));
        }
        table
    }
}

/// Renders one recipe as a `####` subsection in the item summary.
fn render_recipe(recipe: &Recipe) -> String {
    match &recipe.body {
        RecipeBody::Crafting { keys, pattern } => {
            let mut section = String::from("#### **Crafting recipe:**\n");
            for (label, key) in keys {
                section.push_str(&format!("\n- {} as {label}", key.true_item()));
            }
            if let Some(rows) = pattern {
                section.push_str("\n\n```\n");
                for row in rows {
                    section.push_str(row);
                    section.push('\n');
                }
                section.push_str("```");
            }
            section
        }
        RecipeBody::Furnace { input } => {
            format!("#### **Furnace recipe:**\n\n- input: {}", input.true_item())
        }
        RecipeBody::Brewing { input, reagent } => {
            format!(
                "#### **Brewing recipe:**\n\n- input: {}\n- reagent: {}",
                input.true_item(),
                reagent.true_item()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::index::{
        AssetIndex, Entity, EntityCategory, IngredientData, ItemRecord, LootTable, RecipeKey, SpawnEgg,
    };
    use crate::index::ItemOffer;
    use crate::resolver::CrossRefs;
    use std::path::PathBuf;

    fn item(id: &str, path: &str, player_facing: Option<bool>) -> ItemRecord {
        ItemRecord {
            identifier: Identifier::new(id),
            description: vec![format!("About {id}.")],
            player_facing,
            path: PathBuf::from(path),
        }
    }

    fn shaped_recipe(id: &str, output: &str) -> Recipe {
        Recipe {
            identifier: Identifier::new(id),
            result: RecipeKey { item: Identifier::new(output), data: IngredientData::Value(0) },
            body: RecipeBody::Crafting {
                keys: vec![
                    (
                        "I".to_string(),
                        RecipeKey {
                            item: Identifier::new("ns:ice_shard"),
                            data: IngredientData::Value(0),
                        },
                    ),
                    (
                        "S".to_string(),
                        RecipeKey {
                            item: Identifier::new("minecraft:stick"),
                            data: IngredientData::Value(0),
                        },
                    ),
                ],
                pattern: Some(vec!["I  ".to_string(), "I  ".to_string(), "S  ".to_string()]),
            },
            path: PathBuf::from("frost_blade.json"),
        }
    }

    fn fixture() -> (AssetIndex, GeneratorConfig) {
        let mut index = AssetIndex::default();
        for record in [
            item("ns:frost_blade", "weapons/frost_blade.json", None),
            item("ns:debug_wand", "debug/wand.json", Some(false)),
        ] {
            index.items.insert(record.identifier.clone(), record);
        }
        let recipe = shaped_recipe("ns:frost_blade_recipe", "ns:frost_blade");
        index.recipes.insert(recipe.identifier.clone(), recipe);

        let golem = Entity {
            identifier: Identifier::new("ns:golem"),
            description: Vec::new(),
            locations: Vec::new(),
            category: EntityCategory::Creature,
            spawn_egg: Some(SpawnEgg {
                description: vec!["Summons the golem.".to_string()],
                player_facing: None,
            }),
            loot_tables: vec!["loot_tables/golem.json".to_string()],
            trade_tables: Vec::new(),
            path: PathBuf::from("mobs/golem.json"),
        };
        index.entities.insert(golem.identifier.clone(), golem);
        index.loot_tables.insert(
            "loot_tables/golem.json".to_string(),
            LootTable {
                table_path: "loot_tables/golem.json".to_string(),
                offers: vec![ItemOffer { item: Identifier::new("ns:frost_blade"), actor: None }],
                path: PathBuf::from("golem.json"),
            },
        );
        (index, GeneratorConfig::new("BP", "RP", "data"))
    }

    fn everything() -> PatternFilter {
        PatternFilter::new(&["**/*"], &[]).unwrap()
    }

    #[test]
    fn test_player_facing_selector_splits_the_store() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let reports = Reports { index: &index, refs: &refs, config: &config };

        let facing =
            reports.list_items(ItemKind::Item, &everything(), PlayerFacingSelector::PlayerFacing);
        assert_eq!(facing, "- ns:frost_blade");
        let hidden =
            reports.list_items(ItemKind::Item, &everything(), PlayerFacingSelector::NonPlayerFacing);
        assert_eq!(hidden, "- ns:debug_wand");
    }

    #[test]
    fn test_summary_includes_recipe_and_dropped_by() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let reports = Reports { index: &index, refs: &refs, config: &config };

        let filter = PatternFilter::new(&["weapons/**"], &[]).unwrap();
        let summary = reports.summarize_items(ItemKind::Item, &filter, PlayerFacingSelector::All);
        assert!(summary.starts_with("### ns:frost_blade"));
        assert!(summary.contains("#### **Crafting recipe:**"));
        assert!(summary.contains("- ns:ice_shard as I"));
        assert!(summary.contains("```\nI  \nI  \nS  \n```"));
        assert!(summary.contains("#### **Dropped by:**\n\n- ns:golem"));
        assert!(!summary.contains("#### **Traded by:**"));
    }

    #[test]
    fn test_spawn_egg_report_uses_owner_entity() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let reports = Reports { index: &index, refs: &refs, config: &config };

        let listed = reports.list_items(ItemKind::SpawnEgg, &everything(), PlayerFacingSelector::All);
        assert_eq!(listed, "- ns:golem_spawn_egg");
        // Eggs default to non-player-facing when nothing crafts or sells them.
        let facing =
            reports.list_items(ItemKind::SpawnEgg, &everything(), PlayerFacingSelector::PlayerFacing);
        assert_eq!(facing, NO_MATCHING_DATA);

        let summary = reports.summarize_items(ItemKind::SpawnEgg, &everything(), PlayerFacingSelector::All);
        assert!(summary.contains("Summons the golem."));
    }

    #[test]
    fn test_table_matches_summary_selection() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let reports = Reports { index: &index, refs: &refs, config: &config };

        let table = reports.items_table(ItemKind::Item, &everything(), PlayerFacingSelector::All);
        assert!(table.starts_with("| Item | Description |\n|---|---|"));
        assert!(table.contains("| ns:debug_wand | About ns:debug_wand. |"));
        assert!(table.contains("| ns:frost_blade | About ns:frost_blade. |"));
    }
}
