//! Sound definitions manifest parsing.
//!
//! The manifest maps sound identifiers to their audio files. Newer packs
//! nest the map under a `sound_definitions` key next to `format_version`;
//! older packs put the map at the root. Sound entries are either plain path
//! strings or `{"name": path}` objects.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Warning, Warnings};

pub(super) fn parse_sound_definitions(
    value: &Value,
    warnings: &mut Warnings,
) -> BTreeMap<String, Vec<String>> {
    let definitions = value.get("sound_definitions").unwrap_or(value);
    let Some(definitions) = definitions.as_object() else {
        warnings.push(Warning::general("sound definitions manifest is not an object"));
        return BTreeMap::new();
    };

    let mut sounds = BTreeMap::new();
    for (identifier, definition) in definitions {
        if identifier == "format_version" {
            continue;
        }
        let mut files = Vec::new();
        if let Some(entries) = definition.get("sounds").and_then(Value::as_array) {
            for entry in entries {
                match entry {
                    Value::String(path) => files.push(path.clone()),
                    Value::Object(obj) => {
                        if let Some(path) = obj.get("name").and_then(Value::as_str) {
                            files.push(path.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        sounds.insert(identifier.clone(), files);
    }
    sounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_manifest_format() {
        let value = json!({
            "format_version": "1.14.0",
            "sound_definitions": {
                "ns.golem.roar": { "sounds": ["sounds/golem/roar1", { "name": "sounds/golem/roar2" }] },
                "ns.ambient.wind": { "sounds": [] }
            }
        });
        let mut warnings = Warnings::new();
        let sounds = parse_sound_definitions(&value, &mut warnings);
        assert!(warnings.is_empty());
        assert_eq!(sounds.len(), 2);
        assert_eq!(sounds["ns.golem.roar"], vec!["sounds/golem/roar1", "sounds/golem/roar2"]);
        assert!(sounds["ns.ambient.wind"].is_empty());
    }

    #[test]
    fn test_flat_legacy_format() {
        let value = json!({
            "ns.ui.click": { "sounds": ["sounds/ui/click"] }
        });
        let mut warnings = Warnings::new();
        let sounds = parse_sound_definitions(&value, &mut warnings);
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds["ns.ui.click"], vec!["sounds/ui/click"]);
    }

    #[test]
    fn test_non_object_manifest_warns() {
        let mut warnings = Warnings::new();
        let sounds = parse_sound_definitions(&json!([1, 2, 3]), &mut warnings);
        assert!(sounds.is_empty());
        assert_eq!(warnings.into_vec().len(), 1);
    }
}
