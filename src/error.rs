//! Error handling for the content guide generator.
//!
//! Failures fall into two categories with very different handling (see the
//! taxonomy below):
//!
//! - **Warnings** ([`Warning`]): a single malformed asset file or an
//!   unresolvable spawn-egg attribution. These are recovered locally, the
//!   offending record is skipped, and the warning is collected on the run
//!   result so callers can surface incompleteness next to the output.
//! - **Fatal errors** ([`GuideError`]): anything wrong with the template
//!   itself - an unknown directive, bad arguments, an unreadable `insert`
//!   target, or a self-referential insert chain. These abort the render;
//!   partial output from a broken template is not trustworthy.
//!
//! Every fatal variant carries enough context (file, line, directive name)
//! to point at the exact line of the template at fault.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal errors that abort a render.
///
/// Each variant names the template file and line it originates from, so the
/// CLI can report the offending directive without any extra bookkeeping.
#[derive(Error, Debug)]
pub enum GuideError {
    /// A `:generate:` line that does not parse as `name(arg, arg, ...)`.
    #[error("Invalid directive syntax in {file} at line {line}: {text}")]
    DirectiveSyntax {
        /// Template file containing the directive
        file: PathBuf,
        /// 1-based line number of the directive
        line: usize,
        /// The directive text as written
        text: String,
    },

    /// A directive naming a function that is not in the registry.
    #[error("Unknown directive '{name}' in {file} at line {line}")]
    UnknownDirective {
        /// The unrecognized function name
        name: String,
        /// Template file containing the directive
        file: PathBuf,
        /// 1-based line number of the directive
        line: usize,
    },

    /// A known directive whose arguments fail arity or type validation.
    #[error("Invalid arguments for '{name}' in {file} at line {line}: {reason}")]
    DirectiveArgs {
        /// The directive function name
        name: String,
        /// Template file containing the directive
        file: PathBuf,
        /// 1-based line number of the directive
        line: usize,
        /// What exactly was wrong with the arguments
        reason: String,
    },

    /// An `insert` directive whose target document cannot be read.
    #[error("Cannot read inserted document '{path}' (insert in {file} at line {line})")]
    InsertUnreadable {
        /// The document the directive tried to insert
        path: PathBuf,
        /// Template file containing the insert
        file: PathBuf,
        /// 1-based line number of the insert
        line: usize,
        /// The underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// An insert chain that revisits a document already being expanded.
    #[error("Insert cycle detected: {}", format_chain(chain))]
    InsertCycle {
        /// The chain of open documents, ending with the repeated one
        chain: Vec<PathBuf>,
    },

    /// The root template file cannot be read.
    #[error("Cannot read template '{path}'")]
    TemplateRead {
        /// Path to the unreadable template
        path: PathBuf,
        /// The underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A glob pattern that fails to compile.
    #[error("Invalid glob pattern '{pattern}'")]
    Pattern {
        /// The offending pattern string
        pattern: String,
        /// The compilation failure
        #[source]
        source: glob::PatternError,
    },
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> ")
}

/// A recoverable problem attached to the run result.
///
/// Warnings never abort the render. They accompany successful output so the
/// caller can tell which parts of the guide may be incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// The asset or function file the warning is about, when there is one.
    pub path: Option<PathBuf>,
    /// Human-readable description of the problem.
    pub message: String,
}

impl Warning {
    /// A warning tied to a specific file.
    pub fn file(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self { path: Some(path.as_ref().to_path_buf()), message: message.into() }
    }

    /// A warning with no associated file.
    pub fn general(message: impl Into<String>) -> Self {
        Self { path: None, message: message.into() }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Collector for warnings raised during a run.
///
/// Every warning is also emitted through `tracing` at `warn` level as it is
/// recorded, so interactive runs see problems immediately while batch
/// callers still get the full list from [`crate::GuideOutput`].
#[derive(Debug, Default)]
pub struct Warnings {
    entries: Vec<Warning>,
}

impl Warnings {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it.
    pub fn push(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.entries.push(warning);
    }

    /// The warnings recorded so far.
    pub fn entries(&self) -> &[Warning] {
        &self.entries
    }

    /// `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the collector, returning the recorded warnings.
    pub fn into_vec(self) -> Vec<Warning> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_cycle_reports_full_chain() {
        let err = GuideError::InsertCycle {
            chain: vec![
                PathBuf::from("TEMPLATE.md"),
                PathBuf::from("a.md"),
                PathBuf::from("b.md"),
                PathBuf::from("a.md"),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("TEMPLATE.md -> a.md -> b.md -> a.md"), "{message}");
    }

    #[test]
    fn test_warning_display_with_and_without_path() {
        let with_path = Warning::file("entities/bad.json", "missing entity identifier");
        assert_eq!(with_path.to_string(), "entities/bad.json: missing entity identifier");

        let bare = Warning::general("unresolved spawn egg actor");
        assert_eq!(bare.to_string(), "unresolved spawn egg actor");
    }

    #[test]
    fn test_warnings_collector_preserves_order() {
        let mut warnings = Warnings::new();
        assert!(warnings.is_empty());
        warnings.push(Warning::general("first"));
        warnings.push(Warning::general("second"));
        let collected = warnings.into_vec();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].message, "first");
        assert_eq!(collected[1].message, "second");
    }
}
