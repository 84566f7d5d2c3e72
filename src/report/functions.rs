//! Reports built from mcfunction files: the completion guide and the warp
//! list.
//!
//! Both scan `BP/functions/` through the directive's glob filter and read
//! the leading `#` doc comment of each matched file. The completion guide
//! additionally requires the `<step_number>_<step_name>` naming convention;
//! the warp list additionally requires a `/tp` command to pull the target
//! coordinates from. Files violating either convention are warnings and
//! are skipped, never rendered half-empty.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{nice_name, sections_or_placeholder, Reports, NO_MATCHING_DATA};
use crate::error::{Warning, Warnings};
use crate::pattern::PatternFilter;

/// The `<step_number>_<step_name>` file stem convention.
static STEP_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)_(.+)$").unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

/// A teleport command with literal target coordinates.
static TP_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*/?(?:tp|teleport)\s+(?:@\S+\s+)?(-?[0-9]+(?:\.[0-9]+)?)\s+(-?[0-9]+(?:\.[0-9]+)?)\s+(-?[0-9]+(?:\.[0-9]+)?)",
    )
    .unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

impl Reports<'_> {
    /// Ordered `### <n> - <Step name>` sections for the completion guide.
    pub fn completion_guide(&self, filter: &PatternFilter, warnings: &mut Warnings) -> String {
        let functions_root = self.config.functions_path();
        let mut steps = Vec::new();
        for rel in filter.find_files(&functions_root) {
            let Some(source) = read_function(&functions_root.join(&rel), &rel, warnings) else {
                continue;
            };
            let stem = file_stem(&rel);
            let Some(captures) = STEP_FILE_NAME.captures(stem) else {
                warnings.push(Warning::file(
                    &rel,
                    "completion guide function name should be '<step_number>_<step_name>'",
                ));
                continue;
            };
            let Ok(number) = captures[1].parse::<u64>() else {
                warnings.push(Warning::file(&rel, "completion guide step number is out of range"));
                continue;
            };
            let description = doc_comment(&source);
            if description.is_empty() {
                warnings.push(Warning::file(&rel, "completion guide function has no doc comment"));
                continue;
            }
            steps.push((number, step_title(&captures[2]), function_name(&rel), description));
        }
        steps.sort();

        let sections = steps
            .into_iter()
            .map(|(number, title, name, description)| {
                format!(
                    "### {number} - {title}\n\n{}\n\nYou can complete this step using: `function {name}`",
                    description.join("\n")
                )
            })
            .collect();
        sections_or_placeholder(sections)
    }

    /// `- <description> (x y z)` bullets for the warp functions.
    pub fn warp(&self, filter: &PatternFilter, warnings: &mut Warnings) -> String {
        let functions_root = self.config.functions_path();
        let mut bullets = Vec::new();
        for rel in filter.find_files(&functions_root) {
            let Some(source) = read_function(&functions_root.join(&rel), &rel, warnings) else {
                continue;
            };
            let Some(coordinates) = teleport_target(&source) else {
                warnings.push(Warning::file(&rel, "warp function has no teleport command"));
                continue;
            };
            let comment = doc_comment(&source);
            let description = if comment.is_empty() {
                nice_name(file_stem(&rel))
            } else {
                comment.join(" ")
            };
            bullets.push(format!("- {description} ({coordinates})"));
        }
        if bullets.is_empty() {
            NO_MATCHING_DATA.to_string()
        } else {
            bullets.join("\n")
        }
    }
}

fn read_function(full: &Path, rel: &Path, warnings: &mut Warnings) -> Option<String> {
    match fs::read_to_string(full) {
        Ok(source) => Some(source),
        Err(e) => {
            warnings.push(Warning::file(rel, format!("cannot read function file: {e}")));
            None
        }
    }
}

fn file_stem(rel: &Path) -> &str {
    rel.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

/// The name used with the `/function` command: the relative path with the
/// extension dropped and forward slashes.
fn function_name(rel: &Path) -> String {
    let full = rel.to_string_lossy().replace('\\', "/");
    match full.rsplit_once('.') {
        Some((name, "mcfunction")) => name.to_string(),
        _ => full,
    }
}

/// The leading run of `#` comment lines, markers stripped.
fn doc_comment(source: &str) -> Vec<String> {
    source
        .lines()
        .take_while(|line| line.trim_start().starts_with('#'))
        .map(|line| line.trim_start().trim_start_matches('#').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Underscores to spaces, first letter capitalized.
fn step_title(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

/// The `x y z` target of the first literal teleport command, if any.
fn teleport_target(source: &str) -> Option<String> {
    source.lines().find_map(|line| {
        TP_COMMAND.captures(line).map(|m| format!("{} {} {}", &m[1], &m[2], &m[3]))
    })
}
