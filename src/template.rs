//! The template macro engine.
//!
//! A template is a Markdown document processed line by line: every line is
//! copied verbatim unless it starts with the `:generate:` marker, in which
//! case the remainder must parse as `name(arg, arg, ...)` and the directive
//! is replaced by the rendered report. The argument list is parsed as the
//! body of a JSON array, which gives quoted strings, bracketed lists,
//! booleans and `null` for free; trailing optional arguments may simply be
//! omitted and take their documented defaults.
//!
//! Any directive problem is fatal: partial output from a broken template
//! would be mistaken for the real guide. The one structural directive,
//! `insert(path)`, splices another document (relative to the data
//! directory) and expands it recursively; the chain of currently-open
//! documents travels down the recursion so a self-referential insert fails
//! with the full chain in the error.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{GuideError, Warnings};
use crate::index::EntityCategory;
use crate::pattern::PatternFilter;
use crate::report::{ItemKind, PlayerFacingSelector, Reports};

/// Marker introducing a directive line.
pub const DIRECTIVE_MARKER: &str = ":generate:";

/// One parsed directive occurrence.
struct Directive<'a> {
    name: String,
    args: Vec<Value>,
    file: &'a Path,
    line: usize,
}

impl Directive<'_> {
    fn arg_error(&self, reason: impl Into<String>) -> GuideError {
        GuideError::DirectiveArgs {
            name: self.name.clone(),
            file: self.file.to_path_buf(),
            line: self.line,
            reason: reason.into(),
        }
    }

    fn check_arity(&self, max: usize) -> Result<(), GuideError> {
        if self.args.len() > max {
            Err(self.arg_error(format!("takes at most {max} arguments, got {}", self.args.len())))
        } else {
            Ok(())
        }
    }

    /// A required string argument.
    fn string(&self, index: usize) -> Result<String, GuideError> {
        match self.args.get(index) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(other) => Err(self.arg_error(format!("argument {} should be a string, got {other}", index + 1))),
            None => Err(self.arg_error(format!("missing argument {}", index + 1))),
        }
    }

    /// A required pattern argument: one glob string or a list of them.
    fn patterns(&self, index: usize) -> Result<Vec<String>, GuideError> {
        match self.args.get(index) {
            Some(value) => self.pattern_list(index, value),
            None => Err(self.arg_error(format!("missing search patterns (argument {})", index + 1))),
        }
    }

    /// An optional pattern argument, defaulting to no patterns.
    fn opt_patterns(&self, index: usize) -> Result<Vec<String>, GuideError> {
        match self.args.get(index) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => self.pattern_list(index, value),
        }
    }

    fn pattern_list(&self, index: usize, value: &Value) -> Result<Vec<String>, GuideError> {
        match value {
            Value::String(pattern) => Ok(vec![pattern.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(pattern) => Ok(pattern.clone()),
                    other => Err(self.arg_error(format!(
                        "argument {} should contain glob strings, got {other}",
                        index + 1
                    ))),
                })
                .collect(),
            other => Err(self.arg_error(format!(
                "argument {} should be a glob string or a list of them, got {other}",
                index + 1
            ))),
        }
    }

    /// An optional category set, defaulting to every category.
    fn categories(&self, index: usize) -> Result<BTreeSet<EntityCategory>, GuideError> {
        let raw = match self.args.get(index) {
            None | Some(Value::Null) => return Ok(EntityCategory::ALL.into_iter().collect()),
            Some(Value::String(single)) => vec![single.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(category) => Ok(category.clone()),
                    other => Err(self.arg_error(format!(
                        "argument {} should contain category strings, got {other}",
                        index + 1
                    ))),
                })
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(self.arg_error(format!(
                    "argument {} should be a category or a list of them, got {other}",
                    index + 1
                )));
            }
        };
        raw.iter()
            .map(|name| {
                EntityCategory::parse(name)
                    .ok_or_else(|| self.arg_error(format!("unknown entity category '{name}'")))
            })
            .collect()
    }

    /// An optional player-facing selector, defaulting to `all`.
    fn selector(&self, index: usize) -> Result<PlayerFacingSelector, GuideError> {
        match self.args.get(index) {
            None | Some(Value::Null) => Ok(PlayerFacingSelector::default()),
            Some(Value::String(raw)) => PlayerFacingSelector::parse(raw).ok_or_else(|| {
                self.arg_error(format!(
                    "unknown selector '{raw}' (expected 'player_facing', 'non_player_facing' or 'all')"
                ))
            }),
            Some(other) => {
                Err(self.arg_error(format!("argument {} should be a selector string, got {other}", index + 1)))
            }
        }
    }

    /// The compiled include/exclude filter from the standard leading
    /// `(search_patterns, exclude_patterns?)` argument pair.
    fn filter(&self) -> Result<PatternFilter, GuideError> {
        PatternFilter::new(&self.patterns(0)?, &self.opt_patterns(1)?)
    }
}

type Handler =
    Box<dyn Fn(&Reports<'_>, &Directive<'_>, &mut Warnings) -> Result<String, GuideError>>;

/// Expands templates against a fixed set of reports.
pub struct Expander<'a> {
    reports: Reports<'a>,
    handlers: HashMap<&'static str, Handler>,
}

#[derive(Clone, Copy)]
enum Mode {
    List,
    Summary,
    Table,
}

impl<'a> Expander<'a> {
    /// Builds the expander and its directive registry.
    pub fn new(reports: Reports<'a>) -> Self {
        let mut handlers: HashMap<&'static str, Handler> = HashMap::new();

        for (name, mode) in [
            ("list_entities", Mode::List),
            ("summarize_entities", Mode::Summary),
            ("summarize_entities_in_tables", Mode::Table),
        ] {
            handlers.insert(
                name,
                Box::new(move |reports, directive, _| {
                    directive.check_arity(3)?;
                    let filter = directive.filter()?;
                    let categories = directive.categories(2)?;
                    Ok(match mode {
                        Mode::List => reports.list_entities(&filter, &categories),
                        Mode::Summary => reports.summarize_entities(&filter, &categories),
                        Mode::Table => reports.entities_table(&filter, &categories),
                    })
                }),
            );
        }

        for (kind, names) in [
            (ItemKind::Item, ["list_items", "summarize_items", "summarize_items_in_tables"]),
            (ItemKind::Block, ["list_blocks", "summarize_blocks", "summarize_blocks_in_tables"]),
            (
                ItemKind::SpawnEgg,
                ["list_spawn_eggs", "summarize_spawn_eggs", "summarize_spawn_eggs_in_tables"],
            ),
        ] {
            for (name, mode) in names.into_iter().zip([Mode::List, Mode::Summary, Mode::Table]) {
                handlers.insert(
                    name,
                    Box::new(move |reports, directive, _| {
                        directive.check_arity(3)?;
                        let filter = directive.filter()?;
                        let selector = directive.selector(2)?;
                        Ok(match mode {
                            Mode::List => reports.list_items(kind, &filter, selector),
                            Mode::Summary => reports.summarize_items(kind, &filter, selector),
                            Mode::Table => reports.items_table(kind, &filter, selector),
                        })
                    }),
                );
            }
        }

        handlers.insert(
            "completion_guide",
            Box::new(|reports, directive, warnings| {
                directive.check_arity(2)?;
                Ok(reports.completion_guide(&directive.filter()?, warnings))
            }),
        );
        handlers.insert(
            "warp",
            Box::new(|reports, directive, warnings| {
                directive.check_arity(2)?;
                Ok(reports.warp(&directive.filter()?, warnings))
            }),
        );
        handlers.insert(
            "summarize_trades",
            Box::new(|reports, directive, _| {
                directive.check_arity(2)?;
                Ok(reports.summarize_trades(&directive.filter()?))
            }),
        );
        type ZeroArity = fn(&Reports<'_>) -> String;
        let feature_reports: [(&'static str, ZeroArity); 7] = [
            ("list_features", |r| r.list_features()),
            ("summarize_features", |r| r.summarize_features()),
            ("summarize_features_in_tables", |r| r.features_table()),
            ("list_feature_rules", |r| r.list_feature_rules()),
            ("summarize_feature_rules", |r| r.summarize_feature_rules()),
            ("summarize_feature_rules_in_tables", |r| r.feature_rules_table()),
            ("feature_tree", |r| r.feature_tree()),
        ];
        for (name, render) in feature_reports {
            handlers.insert(
                name,
                Box::new(move |reports, directive, _| {
                    directive.check_arity(0)?;
                    Ok(render(reports))
                }),
            );
        }

        handlers.insert(
            "sound_definitions",
            Box::new(|reports, directive, _| {
                directive.check_arity(0)?;
                Ok(reports.sound_definitions())
            }),
        );

        Self { reports, handlers }
    }

    /// Expands one template (named relative to the data directory).
    pub fn expand_template(
        &self,
        template_name: &str,
        warnings: &mut Warnings,
    ) -> Result<String, GuideError> {
        let path = self.reports.config.data_path.join(template_name);
        debug!("Expanding template {:?}", path);
        let source = fs::read_to_string(&path)
            .map_err(|source| GuideError::TemplateRead { path: path.clone(), source })?;
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        let mut open = vec![(canonical, path.clone())];
        self.expand_source(&source, &path, &mut open, warnings)
    }

    /// Runs the line state machine over one document.
    ///
    /// `open` is the chain of documents currently being expanded, as
    /// (canonical, as-written) pairs; it is how insert cycles are caught.
    fn expand_source(
        &self,
        source: &str,
        file: &Path,
        open: &mut Vec<(PathBuf, PathBuf)>,
        warnings: &mut Warnings,
    ) -> Result<String, GuideError> {
        let mut output = String::new();
        for (line_index, line) in source.lines().enumerate() {
            let Some(rest) = line.strip_prefix(DIRECTIVE_MARKER) else {
                output.push_str(line);
                output.push('\n');
                continue;
            };
            let directive = parse_directive(rest, file, line_index + 1)?;
            trace!("Expanding directive '{}' at {:?}:{}", directive.name, file, directive.line);
            let expansion = if directive.name == "insert" {
                self.insert(&directive, open, warnings)?
            } else {
                let handler = self.handlers.get(directive.name.as_str()).ok_or_else(|| {
                    GuideError::UnknownDirective {
                        name: directive.name.clone(),
                        file: file.to_path_buf(),
                        line: directive.line,
                    }
                })?;
                handler(&self.reports, &directive, warnings)?
            };
            output.push_str(&expansion);
            output.push('\n');
        }
        Ok(output)
    }

    /// Splices and recursively expands another document.
    fn insert(
        &self,
        directive: &Directive<'_>,
        open: &mut Vec<(PathBuf, PathBuf)>,
        warnings: &mut Warnings,
    ) -> Result<String, GuideError> {
        directive.check_arity(1)?;
        let target = self.reports.config.data_path.join(directive.string(0)?);
        let unreadable = |source| GuideError::InsertUnreadable {
            path: target.clone(),
            file: directive.file.to_path_buf(),
            line: directive.line,
            source,
        };
        let canonical = target.canonicalize().map_err(unreadable)?;
        if open.iter().any(|(c, _)| *c == canonical) {
            let mut chain: Vec<PathBuf> = open.iter().map(|(_, display)| display.clone()).collect();
            chain.push(target);
            return Err(GuideError::InsertCycle { chain });
        }
        let source = fs::read_to_string(&target).map_err(unreadable)?;

        open.push((canonical, target.clone()));
        let expanded = self.expand_source(&source, &target, open, warnings);
        open.pop();
        // The expansion ends with the final newline of the inserted
        // document; the caller adds the line separator.
        expanded.map(|text| text.trim_end_matches('\n').to_string())
    }
}

/// Parses the remainder of a directive line as `name(arg, arg, ...)`.
fn parse_directive<'a>(rest: &str, file: &'a Path, line: usize) -> Result<Directive<'a>, GuideError> {
    let text = rest.trim();
    let syntax_error = || GuideError::DirectiveSyntax {
        file: file.to_path_buf(),
        line,
        text: text.to_string(),
    };

    let (name, tail) = text.split_once('(').ok_or_else(syntax_error)?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(syntax_error());
    }
    let args_source = tail.strip_suffix(')').ok_or_else(syntax_error)?;

    let args = if args_source.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str::<Vec<Value>>(&format!("[{args_source}]")).map_err(|e| {
            GuideError::DirectiveArgs {
                name: name.to_string(),
                file: file.to_path_buf(),
                line,
                reason: format!("arguments do not parse as a JSON list: {e}"),
            }
        })?
    };
    Ok(Directive { name: name.to_string(), args, file, line })
}
