//! Rewrite command - inflates Go files in place

use anyhow::{Context, Result};
use clap::Args;
use gobloat_transform::TransformStats;
use std::fs;
use std::path::PathBuf;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// Input Go file(s) or directories
    #[arg(default_value = ".")]
    pub inputs: Vec<PathBuf>,

    /// Also rewrite _test.go files
    #[arg(long)]
    pub tests: bool,
}

pub fn run(
    args: RewriteArgs,
    format: OutputFormat,
    use_color: bool,
    verbose: u8,
    quiet: bool,
) -> Result<()> {
    let files = super::collect_go_files(&args.inputs, args.tests)?;

    if files.is_empty() {
        match format {
            OutputFormat::Text => {
                if !quiet {
                    println!("No Go files found.");
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "files": 0,
                        "owners": 0,
                        "wrapped": 0,
                    })
                );
            }
        }
        return Ok(());
    }

    // Fail fast: the first unreadable or unparsable file aborts the run.
    // Files rewritten before that point stay rewritten.
    let mut total = TransformStats::default();
    for file in &files {
        let source = fs::read_to_string(file)
            .with_context(|| format!("could not read {}", file.display()))?;

        let mut tree = gobloat_parser::parse_file(&file.to_string_lossy(), &source)?;
        let stats = gobloat_transform::transform(&mut tree);
        total += stats;

        let output = gobloat_printer::print_file(&tree);
        fs::write(file, output)
            .with_context(|| format!("could not write {}", file.display()))?;

        if verbose > 0 {
            log::info!(
                "{}: wrapped {} statement(s) in {} owner(s)",
                file.display(),
                stats.wrapped,
                stats.owners
            );
        }
    }

    match format {
        OutputFormat::Text => {
            if !quiet {
                let summary = format!(
                    "Rewrote {} file(s): {} statement(s) wrapped across {} owner(s)",
                    files.len(),
                    total.wrapped,
                    total.owners
                );
                if use_color {
                    println!("{}", console::style(summary).green().bold());
                } else {
                    println!("{summary}");
                }
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "success": true,
                    "files": files.len(),
                    "owners": total.owners,
                    "wrapped": total.wrapped,
                })
            );
        }
    }

    Ok(())
}
