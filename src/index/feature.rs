//! Feature and feature-rule records.
//!
//! A feature file's root key names its kind (`minecraft:ore_feature`,
//! `minecraft:scatter_feature`, ...), so the record is extracted from
//! whichever root object carries a `description`. Besides identifier and
//! description, each feature records the features it places: the
//! `places_feature` string used by scatter-like kinds and the entries of
//! `features` lists used by aggregate, sequence, and weighted-random kinds
//! (where an entry may be a `[name, weight]` pair). Feature rules carry at
//! most one placed feature, in their description object.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{description_lines, walk, Identifier};
use crate::error::{Warning, Warnings};

/// One indexed world-generation feature.
#[derive(Debug, Clone)]
pub struct Feature {
    pub identifier: Identifier,
    pub description: Vec<String>,
    /// Identifiers of the features this feature places, sorted.
    pub places: Vec<String>,
    /// Path relative to the features root, used for glob filtering.
    pub path: PathBuf,
}

/// One indexed feature rule.
#[derive(Debug, Clone)]
pub struct FeatureRule {
    pub identifier: Identifier,
    pub description: Vec<String>,
    /// The single feature the rule places, when declared.
    pub places_feature: Option<String>,
    /// Path relative to the feature rules root, used for glob filtering.
    pub path: PathBuf,
}

pub(super) fn parse_feature(rel: &Path, value: &Value, warnings: &mut Warnings) -> Option<Feature> {
    let Some(root) = feature_root(value) else {
        warnings.push(Warning::file(rel, "missing feature description object"));
        return None;
    };
    let description_obj = root.get("description");
    let Some(identifier) =
        description_obj.and_then(|d| d.get("identifier")).and_then(Value::as_str)
    else {
        warnings.push(Warning::file(rel, "missing feature identifier"));
        return None;
    };

    let description = parse_description(rel, description_obj, "feature", warnings);

    let mut places = Vec::new();
    collect_placed_features(root, &mut places);
    places.sort();
    places.dedup();

    Some(Feature {
        identifier: Identifier::new(identifier),
        description,
        places,
        path: rel.to_path_buf(),
    })
}

pub(super) fn parse_feature_rule(
    rel: &Path,
    value: &Value,
    warnings: &mut Warnings,
) -> Option<FeatureRule> {
    let Some(root) = walk(value, &["minecraft:feature_rules", "description"]) else {
        warnings.push(Warning::file(rel, "missing 'minecraft:feature_rules' description object"));
        return None;
    };
    let Some(identifier) = root.get("identifier").and_then(Value::as_str) else {
        warnings.push(Warning::file(rel, "missing feature rule identifier"));
        return None;
    };

    let description = parse_description(rel, Some(root), "feature rule", warnings);
    let places_feature =
        root.get("places_feature").and_then(Value::as_str).map(str::to_string);

    Some(FeatureRule {
        identifier: Identifier::new(identifier),
        description,
        places_feature,
        path: rel.to_path_buf(),
    })
}

/// The kind-specific root object: the one non-`format_version` key whose
/// value carries a `description`.
fn feature_root(value: &Value) -> Option<&Value> {
    value
        .as_object()?
        .iter()
        .find(|(key, v)| *key != "format_version" && v.get("description").is_some())
        .map(|(_, v)| v)
}

fn parse_description(
    rel: &Path,
    description_obj: Option<&Value>,
    kind: &str,
    warnings: &mut Warnings,
) -> Vec<String> {
    match description_obj.and_then(|d| d.get("description")) {
        None => Vec::new(),
        Some(d) => match description_lines(d) {
            Ok(lines) => lines,
            Err(reason) => {
                warnings.push(Warning::file(rel, format!("invalid {kind} description: {reason}")));
                Vec::new()
            }
        },
    }
}

/// Walks the feature body for placed-feature references: `places_feature`
/// strings and the entries of `features` lists (plain names or
/// `[name, weight]` pairs).
fn collect_placed_features(value: &Value, places: &mut Vec<String>) {
    match value {
        Value::Object(obj) => {
            for (key, child) in obj {
                match (key.as_str(), child) {
                    ("places_feature", Value::String(name)) => places.push(name.clone()),
                    ("features", Value::Array(entries)) => {
                        for entry in entries {
                            match entry {
                                Value::String(name) => places.push(name.clone()),
                                Value::Array(pair) => {
                                    if let Some(name) = pair.first().and_then(Value::as_str) {
                                        places.push(name.to_string());
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    _ => collect_placed_features(child, places),
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_placed_features(child, places);
            }
        }
        _ => {}
    }
}
