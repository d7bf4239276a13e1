mod spec_file;

use anyhow::{Context, Result};
use argscan::ParseOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::spec_file::{load_spec, write_default_spec};

#[derive(Parser)]
#[command(name = "argscan")]
#[command(version, about = "Scan argument lists against a JSON command spec", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter argscan.json
    Init(InitArgs),

    /// Parse tokens and print the result as JSON
    Parse(ParseArgs),

    /// Print the one-line usage
    Usage(SpecArgs),

    /// Print usage and per-parameter help
    Help(SpecArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Target directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing argscan.json
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct SpecArgs {
    /// Path to the command spec (default: ./argscan.json)
    #[arg(short, long, value_name = "FILE")]
    spec: Option<PathBuf>,
}

#[derive(Parser)]
struct ParseArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Include the source of every value under "$"
    #[arg(long)]
    track: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Tokens to parse, after `--`
    #[arg(last = true, allow_hyphen_values = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse(args),
        Commands::Usage(args) => usage(args),
        Commands::Help(args) => help(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let dest = write_default_spec(&dir, args.force)?;
    tracing::info!(path = %dest.display(), "wrote command spec");
    println!("{}", dest.display());
    Ok(())
}

fn parse(args: ParseArgs) -> Result<()> {
    let spec = load_spec(args.spec.spec.as_deref())?;
    let parser = spec
        .parser()
        .with_context(|| format!("invalid parameters in `{}`", spec.name))?;

    let options = ParseOptions {
        track: args.track,
        args: None,
    };
    let matches = parser
        .parse(args.tokens.as_slice(), &options)
        .context("failed to parse arguments")?;

    let json = matches.to_json();
    let out = if args.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    println!("{out}");
    Ok(())
}

fn usage(args: SpecArgs) -> Result<()> {
    let spec = load_spec(args.spec.as_deref())?;
    let parser = spec.parser()?;
    println!("{}", parser.usage());
    Ok(())
}

fn help(args: SpecArgs) -> Result<()> {
    let spec = load_spec(args.spec.as_deref())?;
    let parser = spec.parser()?;
    if spec.summary.is_empty() {
        println!("{}", spec.name);
    } else {
        println!("{} - {}", spec.name, spec.summary);
    }
    println!();
    print!("{}", parser.help_text());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
