//! Run configuration for the generator.
//!
//! A [`GeneratorConfig`] names the three input roots the generator reads
//! from and the templates it expands. Nothing here touches the filesystem;
//! missing directories simply yield empty asset stores during the scan.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default template file name, relative to the data directory.
pub const DEFAULT_TEMPLATE: &str = "TEMPLATE.md";

/// Default output name for the rendered guide.
pub const DEFAULT_OUTPUT: &str = "OUTPUT.md";

/// Input roots and template mapping for a single generator run.
///
/// The behavior pack root holds the JSON assets (`entities/`, `items/`,
/// `blocks/`, `recipes/`, `loot_tables/`, `trading/`, `functions/`), the
/// resource pack root holds the sound definitions manifest, and the data
/// directory holds the Markdown templates and any documents they insert.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Behavior pack root directory.
    pub bp_path: PathBuf,
    /// Resource pack root directory.
    pub rp_path: PathBuf,
    /// Directory with the templates and insertable documents.
    pub data_path: PathBuf,
    /// Logical output name -> template file name (relative to `data_path`).
    ///
    /// Iteration order is the output order; a `BTreeMap` keeps it stable.
    pub templates: BTreeMap<String, String>,
}

impl GeneratorConfig {
    /// Creates a config with the default `OUTPUT.md` <- `TEMPLATE.md` mapping.
    pub fn new(
        bp_path: impl AsRef<Path>,
        rp_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
    ) -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(DEFAULT_OUTPUT.to_string(), DEFAULT_TEMPLATE.to_string());
        Self {
            bp_path: bp_path.as_ref().to_path_buf(),
            rp_path: rp_path.as_ref().to_path_buf(),
            data_path: data_path.as_ref().to_path_buf(),
            templates,
        }
    }

    /// Replaces the template mapping with a single named output.
    pub fn with_template(mut self, output: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.clear();
        self.add_template(output, template);
        self
    }

    /// Adds another named output rendered from its own template.
    pub fn add_template(&mut self, output: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(output.into(), template.into());
    }

    /// The directory holding mcfunction files.
    pub fn functions_path(&self) -> PathBuf {
        self.bp_path.join("functions")
    }

    /// The sound definitions manifest inside the resource pack.
    pub fn sound_definitions_path(&self) -> PathBuf {
        self.rp_path.join("sounds").join("sound_definitions.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_mapping() {
        let config = GeneratorConfig::new("BP", "RP", "data");
        assert_eq!(config.templates.len(), 1);
        assert_eq!(config.templates.get(DEFAULT_OUTPUT).map(String::as_str), Some(DEFAULT_TEMPLATE));
    }

    #[test]
    fn test_with_template_replaces_default() {
        let config = GeneratorConfig::new("BP", "RP", "data").with_template("GUIDE.md", "guide_template.md");
        assert_eq!(config.templates.len(), 1);
        assert_eq!(config.templates.get("GUIDE.md").map(String::as_str), Some("guide_template.md"));
    }

    #[test]
    fn test_derived_paths() {
        let config = GeneratorConfig::new("packs/BP", "packs/RP", "data");
        assert_eq!(config.functions_path(), PathBuf::from("packs/BP/functions"));
        assert_eq!(
            config.sound_definitions_path(),
            PathBuf::from("packs/RP/sounds/sound_definitions.json")
        );
    }
}
