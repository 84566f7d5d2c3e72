//! Include/exclude glob filtering for asset and function files.
//!
//! Every report directive selects its input files with one or more glob
//! include patterns and optional exclude patterns, all evaluated against
//! paths relative to a kind-specific root directory (`entities/`,
//! `functions/`, ...). The semantics are fixed:
//!
//! - a path matching *any* include pattern is selected;
//! - a selected path matching *any* exclude pattern is dropped;
//! - no exclude patterns means nothing is excluded.
//!
//! Results are deduplicated and sorted so report output is deterministic.
//!
//! # Pattern Syntax
//!
//! Standard glob patterns: `*` within a path component, `**` across
//! components, `?`, `[abc]`, `[a-z]`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::GuideError;

/// A compiled include/exclude filter over relative paths.
///
/// Compiled once per directive invocation and applied either to an already
/// known path set ([`PatternFilter::matches`]) or to a directory tree on
/// disk ([`PatternFilter::find_files`]).
#[derive(Debug, Clone)]
pub struct PatternFilter {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl PatternFilter {
    /// Compiles include and exclude pattern lists.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::Pattern`] when any pattern has invalid glob
    /// syntax; the error names the offending pattern.
    pub fn new<S: AsRef<str>>(includes: &[S], excludes: &[S]) -> Result<Self, GuideError> {
        let compile = |patterns: &[S]| -> Result<Vec<Pattern>, GuideError> {
            patterns
                .iter()
                .map(|p| {
                    Pattern::new(p.as_ref()).map_err(|source| GuideError::Pattern {
                        pattern: p.as_ref().to_string(),
                        source,
                    })
                })
                .collect()
        };
        Ok(Self { includes: compile(includes)?, excludes: compile(excludes)? })
    }

    /// Checks a relative path against the filter without filesystem access.
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        // Windows produces backslash-separated relative paths; globs use '/'.
        let normalized = path_str.replace('\\', "/");
        // `*` and `?` stay within one path component; only `**` crosses
        // directories.
        let options = MatchOptions { require_literal_separator: true, ..MatchOptions::default() };
        self.includes.iter().any(|p| p.matches_with(&normalized, options))
            && !self.excludes.iter().any(|p| p.matches_with(&normalized, options))
    }

    /// Finds all files under `base` passing the filter.
    ///
    /// Paths are returned relative to `base`, sorted and deduplicated.
    /// Symlinks are not followed. A missing base directory yields an empty
    /// result rather than an error: an absent asset kind is an empty store,
    /// not a failure.
    pub fn find_files(&self, base: &Path) -> Vec<PathBuf> {
        if !base.is_dir() {
            debug!("Skipping missing directory {:?}", base);
            return Vec::new();
        }

        let mut matches = BTreeSet::new();
        for entry in WalkDir::new(base).follow_links(false).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(base) {
                trace!("Checking path {:?}", relative);
                if self.matches(relative) {
                    matches.insert(relative.to_path_buf());
                }
            }
        }

        debug!("Matched {} files under {:?}", matches.len(), base);
        matches.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn filter(includes: &[&str], excludes: &[&str]) -> PatternFilter {
        PatternFilter::new(includes, excludes).unwrap()
    }

    #[test]
    fn test_single_include_pattern() {
        let f = filter(&["*.json"], &[]);
        assert!(f.matches(Path::new("zombie.json")));
        assert!(!f.matches(Path::new("zombie.txt")));
        assert!(!f.matches(Path::new("mobs/zombie.json")));
    }

    #[test]
    fn test_recursive_globstar() {
        let f = filter(&["**/*.json"], &[]);
        assert!(f.matches(Path::new("zombie.json")));
        assert!(f.matches(Path::new("mobs/undead/zombie.json")));
        assert!(!f.matches(Path::new("mobs/undead/zombie.mcfunction")));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filter(&["**/*.json"], &["**/vanilla/*.json"]);
        assert!(f.matches(Path::new("mobs/zombie.json")));
        assert!(!f.matches(Path::new("mobs/vanilla/zombie.json")));
    }

    #[test]
    fn test_star_stays_within_one_component() {
        // Only `**` crosses directories, on both sides of the filter.
        let f = filter(&["*.json"], &[]);
        assert!(f.matches(Path::new("zombie.json")));
        assert!(!f.matches(Path::new("mobs/zombie.json")));
        assert!(!f.matches(Path::new("mobs/undead/zombie.json")));

        let f = filter(&["**/*.json"], &["*.json"]);
        assert!(!f.matches(Path::new("marker.json")));
        assert!(f.matches(Path::new("mobs/zombie.json")));
    }

    #[test]
    fn test_multiple_includes_union() {
        let f = filter(&["mobs/*.json", "npcs/*.json"], &[]);
        assert!(f.matches(Path::new("mobs/zombie.json")));
        assert!(f.matches(Path::new("npcs/trader.json")));
        assert!(!f.matches(Path::new("misc/marker.json")));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = PatternFilter::new(&["[unclosed"], &[]).unwrap_err();
        assert!(matches!(err, GuideError::Pattern { pattern, .. } if pattern == "[unclosed"));
    }

    #[test]
    fn test_find_files_sorted_and_files_only() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("mobs")).unwrap();
        fs::write(base.join("mobs/zombie.json"), "{}").unwrap();
        fs::write(base.join("mobs/axolotl.json"), "{}").unwrap();
        fs::write(base.join("marker.json"), "{}").unwrap();
        fs::write(base.join("notes.txt"), "").unwrap();

        let found = filter(&["**/*.json"], &[]).find_files(base);
        assert_eq!(
            found,
            vec![
                PathBuf::from("marker.json"),
                PathBuf::from("mobs/axolotl.json"),
                PathBuf::from("mobs/zombie.json"),
            ]
        );
    }

    #[test]
    fn test_find_files_missing_base_is_empty() {
        let temp = TempDir::new().unwrap();
        let found = filter(&["**/*"], &[]).find_files(&temp.path().join("does_not_exist"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_files_applies_excludes() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("guide")).unwrap();
        fs::write(base.join("guide/1_start.mcfunction"), "").unwrap();
        fs::write(base.join("guide/2_middle.mcfunction"), "").unwrap();
        fs::write(base.join("guide/wip_3_end.mcfunction"), "").unwrap();

        let found = filter(&["guide/*.mcfunction"], &["guide/wip_*"]).find_files(base);
        assert_eq!(
            found,
            vec![PathBuf::from("guide/1_start.mcfunction"), PathBuf::from("guide/2_middle.mcfunction")]
        );
    }
}
