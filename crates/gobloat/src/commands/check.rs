//! Check command - dry run reporting what rewrite would do

use anyhow::{Context, Result};
use clap::Args;
use gobloat_transform::TransformStats;
use std::fs;
use std::path::PathBuf;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input Go file(s) or directories
    #[arg(default_value = ".")]
    pub inputs: Vec<PathBuf>,

    /// Also check _test.go files
    #[arg(long)]
    pub tests: bool,
}

pub fn run(
    args: CheckArgs,
    format: OutputFormat,
    use_color: bool,
    verbose: u8,
    quiet: bool,
) -> Result<()> {
    let files = super::collect_go_files(&args.inputs, args.tests)?;

    let mut total = TransformStats::default();
    let mut reports = Vec::new();
    for file in &files {
        let source = fs::read_to_string(file)
            .with_context(|| format!("could not read {}", file.display()))?;

        // Transform an in-memory tree only; nothing is written back.
        let mut tree = gobloat_parser::parse_file(&file.to_string_lossy(), &source)?;
        let stats = gobloat_transform::transform(&mut tree);
        total += stats;

        if verbose > 0 && matches!(format, OutputFormat::Text) {
            println!(
                "{}: would wrap {} statement(s) in {} owner(s)",
                file.display(),
                stats.wrapped,
                stats.owners
            );
        }
        reports.push(serde_json::json!({
            "file": file.display().to_string(),
            "owners": stats.owners,
            "wrapped": stats.wrapped,
        }));
    }

    match format {
        OutputFormat::Text => {
            if !quiet {
                let summary = format!(
                    "{} file(s) parse cleanly; rewrite would wrap {} statement(s)",
                    files.len(),
                    total.wrapped
                );
                if use_color {
                    println!("{}", console::style(summary).green());
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
                    "files": reports,
                    "owners": total.owners,
                    "wrapped": total.wrapped,
                })
            );
        }
    }

    Ok(())
}
