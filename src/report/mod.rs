//! The report renderer: pure functions from the index and cross-reference
//! tables to Markdown fragments.
//!
//! Every directive in the template surface maps to one method on
//! [`Reports`]. Rendering never touches the asset stores mutably and never
//! performs I/O except where the source data is the filesystem itself (the
//! mcfunction scans). Entries are always identifier-sorted, so rendering
//! the same report twice yields byte-identical output.
//!
//! A report whose filtered input set is empty renders the fixed placeholder
//! sentence instead of an empty section, so the surrounding document never
//! ends up with a dangling heading.

mod entity;
mod feature;
mod functions;
mod item;
mod sound;
mod trade;

pub use item::ItemKind;

use crate::config::GeneratorConfig;
use crate::index::AssetIndex;
use crate::resolver::CrossRefs;

/// Placeholder rendered when a filter matches nothing.
pub const NO_MATCHING_DATA: &str = "There is no matching data to display.";

/// Player-facing filter applied by item-like report directives.
///
/// The selector works on the *resolved* flag: an explicit `player_facing`
/// field wins, otherwise the crafted/traded/dropped inference applies (see
/// [`CrossRefs::player_facing`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerFacingSelector {
    PlayerFacing,
    NonPlayerFacing,
    #[default]
    All,
}

impl PlayerFacingSelector {
    /// Parses the directive argument form; `None` for unknown values.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "player_facing" => Some(Self::PlayerFacing),
            "non_player_facing" => Some(Self::NonPlayerFacing),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Whether a record with the given resolved flag passes the selector.
    pub fn accepts(self, player_facing: bool) -> bool {
        match self {
            Self::PlayerFacing => player_facing,
            Self::NonPlayerFacing => !player_facing,
            Self::All => true,
        }
    }
}

/// Borrowed view over everything a report needs.
#[derive(Debug, Clone, Copy)]
pub struct Reports<'a> {
    pub index: &'a AssetIndex,
    pub refs: &'a CrossRefs,
    pub config: &'a GeneratorConfig,
}

/// Joins rendered sections with blank lines, or yields the placeholder.
fn sections_or_placeholder(sections: Vec<String>) -> String {
    if sections.is_empty() {
        NO_MATCHING_DATA.to_string()
    } else {
        sections.join("\n\n")
    }
}

/// Bullet list over rendered lines, or the placeholder.
fn bullets_or_placeholder(lines: Vec<String>) -> String {
    if lines.is_empty() {
        NO_MATCHING_DATA.to_string()
    } else {
        lines.iter().map(|line| format!("- {line}")).collect::<Vec<_>>().join("\n")
    }
}

/// A Markdown table cell: `<br>`-joined lines, `N/A` when empty.
fn table_cell(lines: &[String]) -> String {
    if lines.is_empty() {
        "N/A".to_string()
    } else {
        lines.join("<br>")
    }
}

/// Title-cases a dot/underscore-separated identifier into a display name,
/// e.g. `ns.golem.roar_deep` becomes `Ns Golem Roar Deep`.
fn nice_name(identifier: &str) -> String {
    identifier
        .split(['.', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parse_and_accept() {
        assert_eq!(PlayerFacingSelector::parse("player_facing"), Some(PlayerFacingSelector::PlayerFacing));
        assert_eq!(PlayerFacingSelector::parse("all"), Some(PlayerFacingSelector::All));
        assert_eq!(PlayerFacingSelector::parse("visible"), None);

        assert!(PlayerFacingSelector::PlayerFacing.accepts(true));
        assert!(!PlayerFacingSelector::PlayerFacing.accepts(false));
        assert!(PlayerFacingSelector::NonPlayerFacing.accepts(false));
        assert!(PlayerFacingSelector::All.accepts(false));
    }

    #[test]
    fn test_empty_report_is_the_placeholder() {
        assert_eq!(sections_or_placeholder(Vec::new()), NO_MATCHING_DATA);
        assert_eq!(bullets_or_placeholder(Vec::new()), NO_MATCHING_DATA);
    }

    #[test]
    fn test_table_cell_joins_and_defaults() {
        assert_eq!(table_cell(&[]), "N/A");
        assert_eq!(table_cell(&["one".to_string(), "two".to_string()]), "one<br>two");
    }

    #[test]
    fn test_nice_name() {
        assert_eq!(nice_name("ns.golem.roar_deep"), "Ns Golem Roar Deep");
        assert_eq!(nice_name("wind"), "Wind");
    }
}
