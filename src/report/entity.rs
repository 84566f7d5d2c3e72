//! Entity reports: list, summary, and table modes.
//!
//! All three modes share the same selection step (path filter plus category
//! set over the resolved category) so a table and a summary over the same
//! arguments always mention exactly the same entities.

use std::collections::BTreeSet;

use super::{bullets_or_placeholder, sections_or_placeholder, table_cell, Reports, NO_MATCHING_DATA};
use crate::index::{Entity, EntityCategory};
use crate::pattern::PatternFilter;

impl Reports<'_> {
    fn select_entities(
        &self,
        filter: &PatternFilter,
        categories: &BTreeSet<EntityCategory>,
    ) -> Vec<&Entity> {
        self.index
            .entities
            .values()
            .filter(|e| categories.contains(&e.category) && filter.matches(&e.path))
            .collect()
    }

    /// `- identifier` bullets for every matching entity.
    pub fn list_entities(&self, filter: &PatternFilter, categories: &BTreeSet<EntityCategory>) -> String {
        let lines = self
            .select_entities(filter, categories)
            .into_iter()
            .map(|e| e.identifier.to_string())
            .collect();
        bullets_or_placeholder(lines)
    }

    /// One `### identifier` section per matching entity, with description
    /// and location lines.
    pub fn summarize_entities(
        &self,
        filter: &PatternFilter,
        categories: &BTreeSet<EntityCategory>,
    ) -> String {
        let sections = self
            .select_entities(filter, categories)
            .into_iter()
            .map(|entity| {
                let mut section = format!("### {}", entity.identifier);
                if !entity.description.is_empty() {
                    section.push_str("\n\n");
                    section.push_str(&entity.description.join("\n"));
                }
                if !entity.locations.is_empty() {
                    section.push_str("\n\n**Locations:** ");
                    section.push_str(&format_locations(&entity.locations));
                }
                section
            })
            .collect();
        sections_or_placeholder(sections)
    }

    /// A `| Entity | Description | Locations |` table over the selection.
    pub fn entities_table(
        &self,
        filter: &PatternFilter,
        categories: &BTreeSet<EntityCategory>,
    ) -> String {
        let selected = self.select_entities(filter, categories);
        if selected.is_empty() {
            return NO_MATCHING_DATA.to_string();
        }
        let mut table = String::from("| Entity | Description | Locations |\n|---|---|---|");
        for entity in selected {
            let locations: Vec<String> =
                entity.locations.iter().map(|l| format!("({l})")).collect();
            table.push_str(&format!(
                "\n| {} | {} | {} |",
                entity.identifier,
                table_cell(&entity.description),
                table_cell(&locations),
            ));
        }
        table
    }
}

fn format_locations(locations: &[String]) -> String {
    locations.iter().map(|l| format!("({l})")).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::index::{AssetIndex, Identifier};
    use crate::resolver::CrossRefs;
    use std::path::PathBuf;

    fn entity(id: &str, path: &str, category: EntityCategory) -> Entity {
        Entity {
            identifier: Identifier::new(id),
            description: vec![format!("About {id}.")],
            locations: Vec::new(),
            category,
            spawn_egg: None,
            loot_tables: Vec::new(),
            trade_tables: Vec::new(),
            path: PathBuf::from(path),
        }
    }

    fn fixture() -> (AssetIndex, CrossRefs, GeneratorConfig) {
        let mut index = AssetIndex::default();
        for e in [
            entity("ns:arrow", "projectiles/arrow.json", EntityCategory::Projectile),
            entity("ns:golem", "mobs/golem.json", EntityCategory::Creature),
            entity("ns:marker", "util/marker.json", EntityCategory::Uncategorized),
        ] {
            index.entities.insert(e.identifier.clone(), e);
        }
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        (index, refs, GeneratorConfig::new("BP", "RP", "data"))
    }

    fn all_categories() -> BTreeSet<EntityCategory> {
        EntityCategory::ALL.into_iter().collect()
    }

    fn everything() -> PatternFilter {
        PatternFilter::new(&["**/*"], &[]).unwrap()
    }

    #[test]
    fn test_list_is_sorted_and_idempotent() {
        let (index, refs, config) = fixture();
        let reports = Reports { index: &index, refs: &refs, config: &config };
        let listed = reports.list_entities(&everything(), &all_categories());
        assert_eq!(listed, "- ns:arrow\n- ns:golem\n- ns:marker");
        assert_eq!(listed, reports.list_entities(&everything(), &all_categories()));
    }

    #[test]
    fn test_category_filter_selects_projectiles() {
        let (index, refs, config) = fixture();
        let reports = Reports { index: &index, refs: &refs, config: &config };
        let categories: BTreeSet<EntityCategory> = [EntityCategory::Projectile].into_iter().collect();
        assert_eq!(reports.list_entities(&everything(), &categories), "- ns:arrow");
    }

    #[test]
    fn test_summary_with_locations() {
        let (mut index, refs, config) = fixture();
        if let Some(golem) = index.entities.get_mut("ns:golem") {
            golem.locations = vec!["10 64 -20".to_string(), "0 70 0".to_string()];
        }
        let reports = Reports { index: &index, refs: &refs, config: &config };
        let categories: BTreeSet<EntityCategory> = [EntityCategory::Creature].into_iter().collect();
        let summary = reports.summarize_entities(&everything(), &categories);
        assert_eq!(summary, "### ns:golem\n\nAbout ns:golem.\n\n**Locations:** (10 64 -20), (0 70 0)");
    }

    #[test]
    fn test_table_and_summary_mention_the_same_entities() {
        let (index, refs, config) = fixture();
        let reports = Reports { index: &index, refs: &refs, config: &config };
        let filter = PatternFilter::new(&["mobs/**", "util/**"], &[]).unwrap();
        let table = reports.entities_table(&filter, &all_categories());
        let summary = reports.summarize_entities(&filter, &all_categories());
        for id in ["ns:golem", "ns:marker"] {
            assert!(table.contains(id));
            assert!(summary.contains(&format!("### {id}")));
        }
        assert!(!table.contains("ns:arrow"));
        assert!(!summary.contains("ns:arrow"));
    }

    #[test]
    fn test_table_uses_na_for_empty_cells() {
        let (mut index, refs, config) = fixture();
        if let Some(marker) = index.entities.get_mut("ns:marker") {
            marker.description.clear();
        }
        let reports = Reports { index: &index, refs: &refs, config: &config };
        let categories: BTreeSet<EntityCategory> = [EntityCategory::Uncategorized].into_iter().collect();
        let table = reports.entities_table(&everything(), &categories);
        assert!(table.contains("| ns:marker | N/A | N/A |"));
    }

    #[test]
    fn test_no_match_renders_placeholder() {
        let (index, refs, config) = fixture();
        let reports = Reports { index: &index, refs: &refs, config: &config };
        let filter = PatternFilter::new(&["nothing/**"], &[]).unwrap();
        assert_eq!(reports.list_entities(&filter, &all_categories()), NO_MATCHING_DATA);
        assert_eq!(reports.summarize_entities(&filter, &all_categories()), NO_MATCHING_DATA);
        assert_eq!(reports.entities_table(&filter, &all_categories()), NO_MATCHING_DATA);
    }
}
