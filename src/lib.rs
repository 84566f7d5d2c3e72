//! guidegen - content guide generator for behavior packs
//!
//! Turns the JSON assets of a Minecraft Bedrock behavior/resource pack pair
//! into a Markdown content guide. A guide is written as a Markdown template
//! in which `:generate:` directive lines are replaced by reports rendered
//! from the pack's entities, items, blocks, recipes, loot tables, trades,
//! features, sounds, and mcfunction files.
//!
//! # Architecture Overview
//!
//! A run is a strict pipeline with no shared mutable state:
//!
//! 1. scan the pack directories once into an immutable [`index::AssetIndex`];
//! 2. derive the [`resolver::CrossRefs`] relation tables (crafted-by,
//!    dropped-by, traded-by, spawn-egg ownership) in one pass;
//! 3. expand each configured template through the
//!    [`template::Expander`], whose directives call the pure
//!    [`report::Reports`] renderers.
//!
//! Asset problems (malformed files, unresolvable spawn eggs) are warnings
//! collected on the run result; template problems (unknown directives, bad
//! arguments, insert cycles) are fatal and yield no output at all.
//!
//! # Core Modules
//!
//! - [`config`] - input roots and template mapping for a run
//! - [`pattern`] - include/exclude glob filtering over relative paths
//! - [`index`] - the asset index built from one scan of the packs
//! - [`resolver`] - cross-reference tables and player-facing inference
//! - [`report`] - pure Markdown renderers behind the directive surface
//! - [`template`] - the `:generate:` line state machine and `insert` splicing
//! - [`error`] - the fatal error enum and the warning collector
//!
//! # Example
//!
//! ```no_run
//! use guidegen::{config::GeneratorConfig, generate};
//!
//! # fn main() -> Result<(), guidegen::error::GuideError> {
//! let config = GeneratorConfig::new("packs/BP", "packs/RP", "guide_data");
//! let output = generate(&config)?;
//! for (name, contents) in &output.files {
//!     println!("{name}: {} bytes", contents.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod pattern;
pub mod report;
pub mod resolver;
pub mod template;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{GuideError, Warning, Warnings};
use crate::index::AssetIndex;
use crate::report::Reports;
use crate::resolver::CrossRefs;
use crate::template::Expander;

/// The result of a successful run: one rendered document per configured
/// output, plus everything that went wrong non-fatally along the way.
#[derive(Debug)]
pub struct GuideOutput {
    /// Logical output name -> rendered Markdown.
    pub files: BTreeMap<String, String>,
    /// Recoverable problems encountered during the run, in order.
    pub warnings: Vec<Warning>,
}

/// Runs the whole pipeline: scan, resolve, expand every template.
///
/// # Errors
///
/// Returns a [`GuideError`] for any template problem; asset problems are
/// warnings on the returned [`GuideOutput`] instead.
pub fn generate(config: &GeneratorConfig) -> Result<GuideOutput, GuideError> {
    let mut warnings = Warnings::new();

    let index = AssetIndex::scan(config, &mut warnings);
    let refs = CrossRefs::build(&index, &mut warnings);
    let reports = Reports { index: &index, refs: &refs, config };
    let expander = Expander::new(reports);

    let mut files = BTreeMap::new();
    for (output_name, template_name) in &config.templates {
        debug!("Rendering {output_name} from {template_name}");
        let rendered = expander.expand_template(template_name, &mut warnings)?;
        files.insert(output_name.clone(), rendered);
    }

    Ok(GuideOutput { files, warnings: warnings.into_vec() })
}
