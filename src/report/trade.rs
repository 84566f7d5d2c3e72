//! The trade summary report.
//!
//! One section per matched trade table: the entities offering it, then the
//! tier/offer structure reproduced inside a code fence so the grouping and
//! selection counts survive Markdown rendering untouched.

use super::{sections_or_placeholder, Reports};
use crate::index::{Identifier, OfferItem, OfferSide, TradeOffer, TradeTier};
use crate::pattern::PatternFilter;

impl Reports<'_> {
    /// `## Trade: <table path>` sections for every matched trade table.
    pub fn summarize_trades(&self, filter: &PatternFilter) -> String {
        let sections = self
            .index
            .trades
            .values()
            .filter(|table| filter.matches(&table.path))
            .map(|table| {
                let mut section = format!("## Trade: {}", table.table_path);

                let owners: Vec<&Identifier> = self
                    .index
                    .entities
                    .values()
                    .filter(|e| e.trade_tables.iter().any(|t| t == &table.table_path))
                    .map(|e| &e.identifier)
                    .collect();
                if !owners.is_empty() {
                    let owners: Vec<String> = owners.iter().map(|id| id.to_string()).collect();
                    section.push_str(&format!("\n\n**Offered by:** {}", owners.join(", ")));
                }

                section.push_str("\n\n```\n");
                for (tier_index, tier) in table.tiers.iter().enumerate() {
                    section.push_str(&render_tier(tier_index, tier));
                }
                section.push_str("```");
                section
            })
            .collect();
        sections_or_placeholder(sections)
    }
}

fn render_tier(tier_index: usize, tier: &TradeTier) -> String {
    let mut text = format!("Tier {}", tier_index + 1);
    if tier.total_exp_required > 0 {
        text.push_str(&format!(" (requires {} exp)", tier.total_exp_required));
    }
    text.push_str(":\n");
    for trade in &tier.trades {
        text.push_str(&format!("- {}\n", render_trade(trade)));
    }
    for group in &tier.groups {
        if group.num_to_select > 0 {
            text.push_str(&format!("- select {} of:\n", group.num_to_select));
        } else {
            text.push_str("- group:\n");
        }
        for trade in &group.trades {
            text.push_str(&format!("  - {}\n", render_trade(trade)));
        }
    }
    text
}

fn render_trade(trade: &TradeOffer) -> String {
    format!("Gives {} for {}", render_sides(&trade.gives), render_sides(&trade.wants))
}

fn render_sides(sides: &[OfferSide]) -> String {
    if sides.is_empty() {
        return "nothing".to_string();
    }
    sides
        .iter()
        .map(|side| match side {
            OfferSide::Single(item) => render_item(item),
            OfferSide::Choice(items) => {
                let choices: Vec<String> = items.iter().map(render_item).collect();
                format!("({})", choices.join(" or "))
            }
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

fn render_item(item: &OfferItem) -> String {
    // Actor-parameterized eggs are shown as their concrete egg item.
    let identifier = match &item.actor {
        Some(actor) => actor.spawn_egg_id(),
        None => item.item.clone(),
    };
    format!("{}\u{2a2f}{identifier}", item.quantity)
}
