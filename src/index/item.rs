//! Item and block records.
//!
//! Items (`minecraft:item/description`) and blocks
//! (`minecraft:block/description`) share the same guide-relevant shape:
//! identifier, description, and an optional explicit `player_facing` flag.
//! The flag being absent is meaningful - the resolver infers player
//! visibility from craftability, trades, and loot in that case - so it is
//! kept as `Option<bool>` rather than collapsed to a default here.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{description_lines, walk, Identifier};
use crate::error::{Warning, Warnings};

/// One indexed item or block.
#[derive(Debug, Clone)]
pub struct ItemRecord {
    pub identifier: Identifier,
    pub description: Vec<String>,
    /// Explicit player-facing flag, if declared. `None` means "infer".
    pub player_facing: Option<bool>,
    /// Path relative to the kind root, used for glob filtering.
    pub path: PathBuf,
}

pub(super) fn parse_item(rel: &Path, value: &Value, warnings: &mut Warnings) -> Option<ItemRecord> {
    parse_item_like(rel, value, "minecraft:item", "item", warnings)
}

pub(super) fn parse_block(rel: &Path, value: &Value, warnings: &mut Warnings) -> Option<ItemRecord> {
    parse_item_like(rel, value, "minecraft:block", "block", warnings)
}

fn parse_item_like(
    rel: &Path,
    value: &Value,
    root_key: &str,
    kind: &str,
    warnings: &mut Warnings,
) -> Option<ItemRecord> {
    let Some(root) = walk(value, &[root_key, "description"]) else {
        warnings.push(Warning::file(rel, format!("missing '{root_key}' description object")));
        return None;
    };
    let Some(identifier) = root.get("identifier").and_then(Value::as_str) else {
        warnings.push(Warning::file(rel, format!("missing {kind} identifier")));
        return None;
    };

    let description = match root.get("description") {
        None => Vec::new(),
        Some(d) => match description_lines(d) {
            Ok(lines) => lines,
            Err(reason) => {
                warnings.push(Warning::file(rel, format!("invalid {kind} description: {reason}")));
                Vec::new()
            }
        },
    };

    let player_facing = match root.get("player_facing") {
        None => None,
        Some(Value::Bool(flag)) => Some(*flag),
        Some(_) => {
            warnings.push(Warning::file(rel, format!("{kind} player_facing should be a boolean")));
            None
        }
    };

    Some(ItemRecord {
        identifier: Identifier::new(identifier),
        description,
        player_facing,
        path: rel.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_with_explicit_flag() {
        let value = json!({
            "minecraft:item": {
                "description": {
                    "identifier": "ns:frost_blade",
                    "description": "A sword of pure ice.",
                    "player_facing": true
                }
            }
        });
        let mut warnings = Warnings::new();
        let item = parse_item(Path::new("frost_blade.json"), &value, &mut warnings).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(item.identifier.as_str(), "ns:frost_blade");
        assert_eq!(item.description, vec!["A sword of pure ice."]);
        assert_eq!(item.player_facing, Some(true));
    }

    #[test]
    fn test_absent_flag_stays_unknown() {
        let value = json!({
            "minecraft:item": { "description": { "identifier": "ns:token" } }
        });
        let mut warnings = Warnings::new();
        let item = parse_item(Path::new("token.json"), &value, &mut warnings).unwrap();
        // Not false: absence means the flag is inferred later.
        assert_eq!(item.player_facing, None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_block_uses_block_schema_root() {
        let value = json!({
            "minecraft:block": {
                "description": { "identifier": "ns:ice_brick", "player_facing": false }
            }
        });
        let mut warnings = Warnings::new();
        let block = parse_block(Path::new("ice_brick.json"), &value, &mut warnings).unwrap();
        assert_eq!(block.identifier.as_str(), "ns:ice_brick");
        assert_eq!(block.player_facing, Some(false));
    }

    #[test]
    fn test_wrong_schema_root_is_skipped() {
        let value = json!({
            "minecraft:item": { "description": { "identifier": "ns:x" } }
        });
        let mut warnings = Warnings::new();
        assert!(parse_block(Path::new("x.json"), &value, &mut warnings).is_none());
        assert_eq!(warnings.into_vec().len(), 1);
    }

    #[test]
    fn test_non_boolean_flag_warns() {
        let value = json!({
            "minecraft:item": {
                "description": { "identifier": "ns:x", "player_facing": "yes" }
            }
        });
        let mut warnings = Warnings::new();
        let item = parse_item(Path::new("x.json"), &value, &mut warnings).unwrap();
        assert_eq!(item.player_facing, None);
        assert_eq!(warnings.into_vec().len(), 1);
    }
}
