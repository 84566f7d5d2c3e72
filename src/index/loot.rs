//! Loot table records.
//!
//! Only the item outcomes matter for the guide: which item identifiers can
//! fall out of the table's pools. The pool entry tree is walked recursively
//! and every `{"type": "item", "name": ...}` entry becomes an offer; any
//! actor-info query payload inside the entry (spawn-egg parameterization
//! via a set-actor-id function) is captured alongside it.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::recipe::find_actor_query;
use super::{table_path, Identifier};

/// An item that can come out of a loot pool or a trade offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOffer {
    pub item: Identifier,
    /// The entity named by an actor-info query in the entry payload, when
    /// the offer is a runtime-parameterized spawn egg.
    pub actor: Option<Identifier>,
}

/// One indexed loot table, keyed by its pack-relative path.
#[derive(Debug, Clone)]
pub struct LootTable {
    /// The reference form entities use: `loot_tables/<relative path>`.
    pub table_path: String,
    /// Every item entry reachable through the pool tree, in file order.
    pub offers: Vec<ItemOffer>,
    /// Path relative to the loot tables root, used for glob filtering.
    pub path: PathBuf,
}

pub(super) fn parse_loot_table(rel: &Path, value: &Value) -> LootTable {
    let mut offers = Vec::new();
    collect_item_entries(value, &mut offers);
    LootTable { table_path: table_path("loot_tables", rel), offers, path: rel.to_path_buf() }
}

fn collect_item_entries(value: &Value, offers: &mut Vec<ItemOffer>) {
    match value {
        Value::Object(obj) => {
            let is_item_entry = obj.get("type").and_then(Value::as_str) == Some("item");
            if is_item_entry
                && let Some(name) = obj.get("name").and_then(Value::as_str)
            {
                offers.push(ItemOffer {
                    item: Identifier::new(name),
                    actor: find_actor_query(value),
                });
                return;
            }
            for child in obj.values() {
                collect_item_entries(child, offers);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_item_entries(child, offers);
            }
        }
        _ => {}
    }
}
