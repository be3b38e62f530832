//! gobloat - Go source inflator
//!
//! CLI driver for wrapping Go statements in immediately invoked closures.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

/// Go source inflator
#[derive(Parser, Debug)]
#[command(name = "gobloat")]
#[command(author, version, about = "Inflate Go sources with immediately invoked closures")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite Go file(s) in place
    Rewrite(commands::rewrite::RewriteArgs),

    /// Report what would be rewritten without touching any file
    Check(commands::check::CheckArgs),
}

/// Check if the first non-flag argument looks like a Go file
fn is_legacy_invocation(args: &[String]) -> bool {
    for arg in args.iter().skip(1) {
        // Skip flags
        if arg.starts_with('-') {
            continue;
        }
        // Check if it looks like a .go file (and not a subcommand)
        if arg.ends_with(".go") {
            return true;
        }
        // If it's a known subcommand, not legacy
        if matches!(arg.as_str(), "rewrite" | "check" | "help") {
            return false;
        }
        // First non-flag, non-subcommand arg
        break;
    }
    false
}

/// Transform legacy args (gobloat file.go) to subcommand form
fn transform_legacy_args(args: Vec<String>) -> Vec<String> {
    let mut new_args = vec![args[0].clone(), "rewrite".to_string()];
    new_args.extend(args.into_iter().skip(1));
    new_args
}

fn main() -> Result<()> {
    env_logger::init();

    // Handle legacy invocation (gobloat file.go)
    let args: Vec<String> = std::env::args().collect();
    let effective_args = if is_legacy_invocation(&args) {
        transform_legacy_args(args)
    } else {
        args
    };

    let cli = Cli::parse_from(effective_args);

    // Determine if colors should be used
    let use_color = !cli.no_color && !cli.quiet && atty::is(atty::Stream::Stdout);

    // Handle no command case
    if cli.command.is_none() {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    }

    match cli.command.unwrap() {
        Commands::Rewrite(args) => {
            commands::rewrite::run(args, cli.format, use_color, cli.verbose, cli.quiet)
        }
        Commands::Check(args) => {
            commands::check::run(args, cli.format, use_color, cli.verbose, cli.quiet)
        }
    }
}
