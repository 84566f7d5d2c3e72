//! Trade table records.
//!
//! A trade table is tiers of offers; a tier holds either named groups
//! (optionally selecting a subset of their trades) or a flat trade list.
//! Each trade exchanges `wants` for `gives`, where either side can be a
//! choice between alternatives. The structure is kept because the trade
//! summary report reproduces it; the resolver only looks at the flattened
//! offered items.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::loot::ItemOffer;
use super::recipe::find_actor_query;
use super::{table_path, Identifier};
use crate::error::{Warning, Warnings};

/// One offered or wanted item with its quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferItem {
    pub quantity: i64,
    pub item: Identifier,
    /// Actor-info parameterization for generic spawn-egg offers.
    pub actor: Option<Identifier>,
}

/// One side entry of a trade: a fixed item or a choice of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferSide {
    Single(OfferItem),
    Choice(Vec<OfferItem>),
}

/// One trade: everything wanted in exchange for everything given.
#[derive(Debug, Clone, Default)]
pub struct TradeOffer {
    pub wants: Vec<OfferSide>,
    pub gives: Vec<OfferSide>,
}

/// A named group of trades within a tier.
#[derive(Debug, Clone)]
pub struct TradeGroup {
    /// How many of the group's trades get selected; 0 means all of them.
    pub num_to_select: i64,
    pub trades: Vec<TradeOffer>,
}

/// One tier of a trade table.
#[derive(Debug, Clone, Default)]
pub struct TradeTier {
    pub total_exp_required: i64,
    /// Grouped trades, when the tier uses groups.
    pub groups: Vec<TradeGroup>,
    /// Flat trades, when the tier lists them directly.
    pub trades: Vec<TradeOffer>,
}

/// One indexed trade table, keyed by its pack-relative path.
#[derive(Debug, Clone)]
pub struct TradeTable {
    /// The reference form entities use: `trading/<relative path>`.
    pub table_path: String,
    pub tiers: Vec<TradeTier>,
    /// Path relative to the trading root, used for glob filtering.
    pub path: PathBuf,
}

impl TradeTable {
    /// Every item appearing on either side of any trade, flattened.
    pub fn offer_items(&self) -> impl Iterator<Item = &OfferItem> {
        self.tiers
            .iter()
            .flat_map(|tier| {
                tier.trades.iter().chain(tier.groups.iter().flat_map(|g| g.trades.iter()))
            })
            .flat_map(|trade| trade.wants.iter().chain(trade.gives.iter()))
            .flat_map(|side| match side {
                OfferSide::Single(item) => std::slice::from_ref(item).iter(),
                OfferSide::Choice(items) => items.iter(),
            })
    }

    /// The flattened offers in the [`ItemOffer`] form the resolver uses.
    pub fn offers(&self) -> Vec<ItemOffer> {
        self.offer_items()
            .map(|o| ItemOffer { item: o.item.clone(), actor: o.actor.clone() })
            .collect()
    }
}

pub(super) fn parse_trade_table(rel: &Path, value: &Value, warnings: &mut Warnings) -> TradeTable {
    let reference = table_path("trading", rel);
    let mut tiers = Vec::new();

    match value.get("tiers").and_then(Value::as_array) {
        None => warnings.push(Warning::file(rel, "trade table has no 'tiers' list")),
        Some(raw_tiers) => {
            for (tier_index, raw_tier) in raw_tiers.iter().enumerate() {
                tiers.push(parse_tier(rel, tier_index, raw_tier, warnings));
            }
        }
    }

    TradeTable { table_path: reference, tiers, path: rel.to_path_buf() }
}

fn parse_tier(rel: &Path, tier_index: usize, raw: &Value, warnings: &mut Warnings) -> TradeTier {
    let mut tier = TradeTier {
        total_exp_required: raw.get("total_exp_required").and_then(Value::as_i64).unwrap_or(0),
        ..TradeTier::default()
    };

    if let Some(groups) = raw.get("groups").and_then(Value::as_array) {
        for group in groups {
            let trades = parse_trades(rel, group.get("trades"), warnings);
            tier.groups.push(TradeGroup {
                num_to_select: group.get("num_to_select").and_then(Value::as_i64).unwrap_or(0),
                trades,
            });
        }
    } else if raw.get("trades").is_some() {
        tier.trades = parse_trades(rel, raw.get("trades"), warnings);
    } else {
        warnings.push(Warning::file(
            rel,
            format!("tier {} has neither 'groups' nor 'trades'", tier_index + 1),
        ));
    }
    tier
}

fn parse_trades(rel: &Path, raw: Option<&Value>, warnings: &mut Warnings) -> Vec<TradeOffer> {
    let Some(trades) = raw.and_then(Value::as_array) else {
        warnings.push(Warning::file(rel, "'trades' should be a list"));
        return Vec::new();
    };
    trades
        .iter()
        .map(|trade| TradeOffer {
            wants: parse_sides(rel, trade.get("wants"), warnings),
            gives: parse_sides(rel, trade.get("gives"), warnings),
        })
        .collect()
}

fn parse_sides(rel: &Path, raw: Option<&Value>, warnings: &mut Warnings) -> Vec<OfferSide> {
    let Some(entries) = raw.and_then(Value::as_array) else {
        warnings.push(Warning::file(rel, "trade is missing its 'wants' or 'gives' list"));
        return Vec::new();
    };
    let mut sides = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(choices) = entry.get("choice").and_then(Value::as_array) {
            let items: Vec<OfferItem> =
                choices.iter().filter_map(|c| parse_offer_item(rel, c, warnings)).collect();
            if !items.is_empty() {
                sides.push(OfferSide::Choice(items));
            }
        } else if let Some(item) = parse_offer_item(rel, entry, warnings) {
            sides.push(OfferSide::Single(item));
        }
    }
    sides
}

fn parse_offer_item(rel: &Path, entry: &Value, warnings: &mut Warnings) -> Option<OfferItem> {
    let Some(item) = entry.get("item").and_then(Value::as_str) else {
        warnings.push(Warning::file(rel, "trade entry is missing its 'item' property"));
        return None;
    };
    Some(OfferItem {
        quantity: entry.get("quantity").and_then(Value::as_i64).unwrap_or(1),
        item: Identifier::new(item),
        actor: find_actor_query(entry),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &Value) -> (TradeTable, usize) {
        let mut warnings = Warnings::new();
        let table = parse_trade_table(Path::new("golem.json"), value, &mut warnings);
        (table, warnings.into_vec().len())
    }

    #[test]
    fn test_grouped_tiers() {
        let value = json!({
            "tiers": [{
                "total_exp_required": 10,
                "groups": [{
                    "num_to_select": 1,
                    "trades": [{
                        "wants": [{ "item": "minecraft:emerald", "quantity": 3 }],
                        "gives": [{ "item": "ns:ice_shard" }]
                    }]
                }]
            }]
        });
        let (table, warning_count) = parse(&value);
        assert_eq!(warning_count, 0);
        assert_eq!(table.table_path, "trading/golem.json");
        assert_eq!(table.tiers.len(), 1);
        assert_eq!(table.tiers[0].total_exp_required, 10);
        assert_eq!(table.tiers[0].groups.len(), 1);
        let items: Vec<&str> = table.offer_items().map(|o| o.item.as_str()).collect();
        assert_eq!(items, vec!["minecraft:emerald", "ns:ice_shard"]);
    }

    #[test]
    fn test_direct_trades_and_choice() {
        let value = json!({
            "tiers": [{
                "trades": [{
                    "wants": [{
                        "choice": [
                            { "item": "minecraft:emerald", "quantity": 5 },
                            { "item": "ns:frost_gem" }
                        ]
                    }],
                    "gives": [{ "item": "ns:frost_blade" }]
                }]
            }]
        });
        let (table, warning_count) = parse(&value);
        assert_eq!(warning_count, 0);
        let trade = &table.tiers[0].trades[0];
        assert!(matches!(&trade.wants[0], OfferSide::Choice(items) if items.len() == 2));
        assert_eq!(table.offers().len(), 3);
    }

    #[test]
    fn test_spawn_egg_gives_capture_actor() {
        let value = json!({
            "tiers": [{
                "trades": [{
                    "wants": [{ "item": "minecraft:emerald" }],
                    "gives": [{
                        "item": "minecraft:spawn_egg",
                        "functions": [{ "set_actor_id": "q.get_actor_info_id('ns:yeti')" }]
                    }]
                }]
            }]
        });
        let (table, _) = parse(&value);
        let egg = table.offers().into_iter().find(|o| o.item.as_str() == "minecraft:spawn_egg").unwrap();
        assert_eq!(egg.actor.map(|a| a.to_string()), Some("ns:yeti".to_string()));
    }

    #[test]
    fn test_missing_tiers_is_a_warning() {
        let (table, warning_count) = parse(&json!({}));
        assert!(table.tiers.is_empty());
        assert_eq!(warning_count, 1);
    }

    #[test]
    fn test_tier_without_groups_or_trades_warns() {
        let (table, warning_count) = parse(&json!({ "tiers": [{ "total_exp_required": 5 }] }));
        assert_eq!(table.tiers.len(), 1);
        assert_eq!(warning_count, 1);
    }
}
