//! guidegen CLI entry point
//!
//! A thin shell around [`guidegen::generate`]: parse the pack and data
//! paths, run the pipeline, write each rendered guide into the output
//! directory, and report warnings and fatal errors.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use guidegen::config::GeneratorConfig;

/// Generate a Markdown content guide from a behavior/resource pack pair.
#[derive(Parser, Debug)]
#[command(name = "guidegen", version, about)]
struct Cli {
    /// Behavior pack root directory
    #[arg(long, value_name = "DIR")]
    bp: PathBuf,

    /// Resource pack root directory
    #[arg(long, value_name = "DIR")]
    rp: PathBuf,

    /// Directory with the guide templates and insertable documents
    #[arg(long, value_name = "DIR")]
    data: PathBuf,

    /// Directory the rendered guides are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Template file to expand (relative to the data directory); the
    /// output keeps the template's file name
    #[arg(long, value_name = "FILE")]
    template: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = GeneratorConfig::new(&cli.bp, &cli.rp, &cli.data);
    if let Some(template) = &cli.template {
        config = config.with_template(template.clone(), template.clone());
    }

    let output = guidegen::generate(&config).context("failed to generate the content guide")?;

    fs::create_dir_all(&cli.out)
        .with_context(|| format!("cannot create output directory {}", cli.out.display()))?;
    for (name, contents) in &output.files {
        let path = cli.out.join(name);
        fs::write(&path, contents).with_context(|| format!("cannot write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    if !output.warnings.is_empty() {
        eprintln!(
            "{} {} warning(s); the guide may be incomplete",
            "note:".yellow().bold(),
            output.warnings.len()
        );
    }
    Ok(())
}
