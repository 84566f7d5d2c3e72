//! Feature and feature-rule reports: list, summary, and table modes plus
//! the placement tree.
//!
//! Feature directives take no filter arguments: packs keep few enough
//! features that the reports always cover the whole store.

use std::collections::{BTreeMap, BTreeSet};

use super::{bullets_or_placeholder, sections_or_placeholder, table_cell, Reports, NO_MATCHING_DATA};
use crate::index::Identifier;

impl Reports<'_> {
    /// `- identifier` bullets for every indexed feature.
    pub fn list_features(&self) -> String {
        bullets_or_placeholder(self.index.features.keys().map(ToString::to_string).collect())
    }

    /// `- identifier` bullets for every indexed feature rule.
    pub fn list_feature_rules(&self) -> String {
        bullets_or_placeholder(self.index.feature_rules.keys().map(ToString::to_string).collect())
    }

    /// One `### identifier` section per feature, with description and the
    /// features it places.
    pub fn summarize_features(&self) -> String {
        let sections = self
            .index
            .features
            .values()
            .map(|feature| {
                let mut section = format!("### {}", feature.identifier);
                if !feature.description.is_empty() {
                    section.push_str("\n\n");
                    section.push_str(&feature.description.join("\n"));
                }
                if !feature.places.is_empty() {
                    section.push_str("\n\n#### **Places features:**\n");
                    for placed in &feature.places {
                        section.push_str(&format!("\n- {placed}"));
                    }
                }
                section
            })
            .collect();
        sections_or_placeholder(sections)
    }

    /// One `### identifier` section per feature rule, with description and
    /// the single feature it places.
    pub fn summarize_feature_rules(&self) -> String {
        let sections = self
            .index
            .feature_rules
            .values()
            .map(|rule| {
                let mut section = format!("### {}", rule.identifier);
                if !rule.description.is_empty() {
                    section.push_str("\n\n");
                    section.push_str(&rule.description.join("\n"));
                }
                if let Some(placed) = &rule.places_feature {
                    section.push_str(&format!("\n\n**Places feature:** {placed}"));
                }
                section
            })
            .collect();
        sections_or_placeholder(sections)
    }

    /// A `| Feature | Description | Places features |` table over the store.
    pub fn features_table(&self) -> String {
        if self.index.features.is_empty() {
            return NO_MATCHING_DATA.to_string();
        }
        let mut table = String::from("| Feature | Description | Places features |\n|---|---|---|");
        for feature in self.index.features.values() {
            let places =
                if feature.places.is_empty() { Vec::new() } else { vec![feature.places.join(", ")] };
            table.push_str(&format!(
                "\n| {} | {} | {} |",
                feature.identifier,
                table_cell(&feature.description),
                table_cell(&places),
            ));
        }
        table
    }

    /// A `| Feature rule | Description | Places feature |` table over the
    /// store.
    pub fn feature_rules_table(&self) -> String {
        if self.index.feature_rules.is_empty() {
            return NO_MATCHING_DATA.to_string();
        }
        let mut table = String::from("| Feature rule | Description | Places feature |\n|---|---|---|");
        for rule in self.index.feature_rules.values() {
            let places: Vec<String> = rule.places_feature.iter().cloned().collect();
            table.push_str(&format!(
                "\n| {} | {} | {} |",
                rule.identifier,
                table_cell(&rule.description),
                table_cell(&places),
            ));
        }
        table
    }

    /// The placement tree: one fenced block per root feature or feature
    /// rule, indented by placement depth.
    ///
    /// Feature rule names are bracketed. The most common namespace is
    /// stripped from every identifier. A feature placed by some parent is
    /// not repeated as a root, and a subtree already expanded elsewhere is
    /// shortened to `identifier...`.
    pub fn feature_tree(&self) -> String {
        let features = &self.index.features;
        let rules = &self.index.feature_rules;
        if features.is_empty() && rules.is_empty() {
            return NO_MATCHING_DATA.to_string();
        }

        let common_ns = most_common_namespace(features.keys().chain(rules.keys()));
        let strip = |identifier: &str| -> String {
            match identifier.split_once(':') {
                Some((ns, name)) if ns == common_ns => name.to_string(),
                _ => identifier.to_string(),
            }
        };

        // Display-name placement graph, with roots in feature-then-rule
        // order.
        let mut order: Vec<String> = Vec::new();
        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut known_children: BTreeSet<String> = BTreeSet::new();
        let mut known_parents: BTreeSet<String> = BTreeSet::new();
        let mut add = |name: String, placed: Vec<String>| {
            if !placed.is_empty() {
                known_parents.insert(name.clone());
            }
            known_children.extend(placed.iter().cloned());
            order.push(name.clone());
            children.insert(name, placed);
        };
        for feature in features.values() {
            add(strip(feature.identifier.as_str()), feature.places.iter().map(|p| strip(p)).collect());
        }
        for rule in rules.values() {
            let placed = rule.places_feature.iter().map(|p| strip(p)).collect();
            add(format!("[{}]", strip(rule.identifier.as_str())), placed);
        }

        let mut out = vec![
            "The tree below shows which features and feature rules place which features. \
             Feature rule names are written in square brackets. A feature already expanded \
             elsewhere is shortened to an ellipsis (\"...\")."
                .to_string(),
            String::new(),
            format!(
                "For readability the most common namespace ({common_ns}) is stripped from \
                 the identifiers."
            ),
        ];
        let mut logged = BTreeSet::new();
        for root in &order {
            let mut block = Vec::new();
            expand_subtree(root, 0, &children, &known_children, &known_parents, &mut logged, &mut block);
            if !block.is_empty() {
                out.push(String::new());
                out.push("```".to_string());
                out.extend(block);
                out.push("```".to_string());
            }
        }
        out.join("\n")
    }
}

fn most_common_namespace<'a>(identifiers: impl Iterator<Item = &'a Identifier>) -> &'a str {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in identifiers {
        *counts.entry(id.namespace()).or_default() += 1;
    }
    let mut best = ("", 0);
    for (ns, count) in counts {
        if count > best.1 {
            best = (ns, count);
        }
    }
    best.0
}

fn expand_subtree(
    name: &str,
    depth: usize,
    children: &BTreeMap<String, Vec<String>>,
    known_children: &BTreeSet<String>,
    known_parents: &BTreeSet<String>,
    logged: &mut BTreeSet<String>,
    out: &mut Vec<String>,
) {
    // A placed feature is rendered under its parents, not as a root.
    if depth == 0 && known_children.contains(name) {
        return;
    }
    let indent = "  ".repeat(depth);
    if logged.contains(name) && known_parents.contains(name) {
        out.push(format!("{indent}{name}..."));
        return;
    }
    logged.insert(name.to_string());
    out.push(format!("{indent}{name}"));
    for child in children.get(name).map(Vec::as_slice).unwrap_or_default() {
        expand_subtree(child, depth + 1, children, known_children, known_parents, logged, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::index::{AssetIndex, Feature, FeatureRule};
    use crate::resolver::CrossRefs;
    use std::path::PathBuf;

    fn feature(id: &str, description: &[&str], places: &[&str]) -> Feature {
        Feature {
            identifier: Identifier::new(id),
            description: description.iter().map(|s| s.to_string()).collect(),
            places: places.iter().map(|s| s.to_string()).collect(),
            path: PathBuf::from(format!("{}.json", id.replace(':', "_"))),
        }
    }

    fn rule(id: &str, description: &[&str], places: Option<&str>) -> FeatureRule {
        FeatureRule {
            identifier: Identifier::new(id),
            description: description.iter().map(|s| s.to_string()).collect(),
            places_feature: places.map(str::to_string),
            path: PathBuf::from(format!("{}.json", id.replace(':', "_"))),
        }
    }

    fn fixture() -> (AssetIndex, GeneratorConfig) {
        let mut index = AssetIndex::default();
        for f in [
            feature("ns:ice_patch", &["Scattered surface ice."], &["ns:ice_spike"]),
            feature("ns:ice_spike", &[], &[]),
            feature("other:geode", &["A crystal pocket."], &[]),
        ] {
            index.features.insert(f.identifier.clone(), f);
        }
        let r = rule("ns:overworld_ice", &["Cold biomes only."], Some("ns:ice_patch"));
        index.feature_rules.insert(r.identifier.clone(), r);
        (index, GeneratorConfig::new("BP", "RP", "data"))
    }

    fn reports<'a>(
        index: &'a AssetIndex,
        refs: &'a CrossRefs,
        config: &'a GeneratorConfig,
    ) -> Reports<'a> {
        Reports { index, refs, config }
    }

    #[test]
    fn test_lists_are_sorted_bullets() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let r = reports(&index, &refs, &config);
        assert_eq!(r.list_features(), "- ns:ice_patch\n- ns:ice_spike\n- other:geode");
        assert_eq!(r.list_feature_rules(), "- ns:overworld_ice");
    }

    #[test]
    fn test_feature_summary_sections() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let r = reports(&index, &refs, &config);
        let summary = r.summarize_features();
        assert!(summary.contains(
            "### ns:ice_patch\n\nScattered surface ice.\n\n#### **Places features:**\n\n- ns:ice_spike"
        ));
        // No trailing places heading for features that place nothing.
        assert!(summary.contains("### ns:ice_spike"));
        assert!(!summary.contains("ns:ice_spike\n\n#### **Places features:**"));
    }

    #[test]
    fn test_feature_rule_summary_places_line() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let r = reports(&index, &refs, &config);
        assert_eq!(
            r.summarize_feature_rules(),
            "### ns:overworld_ice\n\nCold biomes only.\n\n**Places feature:** ns:ice_patch"
        );
    }

    #[test]
    fn test_tables_use_na_for_empty_cells() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let r = reports(&index, &refs, &config);
        let table = r.features_table();
        assert!(table.starts_with("| Feature | Description | Places features |\n|---|---|---|"));
        assert!(table.contains("| ns:ice_patch | Scattered surface ice. | ns:ice_spike |"));
        assert!(table.contains("| ns:ice_spike | N/A | N/A |"));
        assert!(r.feature_rules_table().contains("| ns:overworld_ice | Cold biomes only. | ns:ice_patch |"));
    }

    #[test]
    fn test_feature_tree_strips_namespace_and_brackets_rules() {
        let (index, config) = fixture();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let tree = reports(&index, &refs, &config).feature_tree();
        // "ns" is the most common namespace; "other:" survives.
        assert!(tree.contains("most common namespace (ns)"));
        assert!(tree.contains("```\nother:geode\n```"));
        // The placed chain renders under the rule, not as separate roots.
        assert!(tree.contains("```\n[overworld_ice]\n  ice_patch\n    ice_spike\n```"));
        assert!(!tree.contains("```\nice_patch"));
        assert!(!tree.contains("```\nice_spike"));
    }

    #[test]
    fn test_feature_tree_survives_placement_cycles() {
        let mut index = AssetIndex::default();
        for f in [
            feature("ns:root", &[], &["ns:a"]),
            feature("ns:a", &[], &["ns:b"]),
            feature("ns:b", &[], &["ns:a"]),
        ] {
            index.features.insert(f.identifier.clone(), f);
        }
        let config = GeneratorConfig::new("BP", "RP", "data");
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let tree = reports(&index, &refs, &config).feature_tree();
        assert!(tree.contains("root\n  a\n    b\n      a..."));
    }

    #[test]
    fn test_empty_stores_render_placeholder() {
        let index = AssetIndex::default();
        let config = GeneratorConfig::new("BP", "RP", "data");
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let r = reports(&index, &refs, &config);
        assert_eq!(r.list_features(), NO_MATCHING_DATA);
        assert_eq!(r.summarize_feature_rules(), NO_MATCHING_DATA);
        assert_eq!(r.features_table(), NO_MATCHING_DATA);
        assert_eq!(r.feature_tree(), NO_MATCHING_DATA);
    }
}
