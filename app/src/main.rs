#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CheckInput, CheckStrategy, CommandStrategy, InfoStrategy, InitStrategy, ScanInput,
    ScanStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "cspscan")]
#[command(about = "Report CSP features declared in an ext_config.ini", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a feature template against an ext_config.ini
    Scan(ScanArgs),
    /// Check whether any of the given tags is present with matching entries
    Check {
        /// INI file to inspect
        #[arg(short, long)]
        ini: PathBuf,

        /// Tag to look for; repeat to try several in order
        #[arg(short, long = "tag", required = true)]
        tags: Vec<String>,

        /// Entry condition as KEY=EXPR (EXPR supports `a|b` and `text!`)
        #[arg(short, long = "entry", value_parser = parse_condition)]
        entries: Vec<(String, String)>,
    },
    /// Initialize configuration
    Init,
    /// Show effective configuration
    Info,
    /// Show version
    Version,
}

#[derive(Args)]
struct ScanArgs {
    /// Preset from the config file (e.g. `car`, `track`)
    #[arg(short, long, conflicts_with_all = ["ini", "template"])]
    preset: Option<String>,

    /// INI file to scan
    #[arg(short, long, required_unless_present = "preset")]
    ini: Option<PathBuf>,

    /// JSON feature template
    #[arg(short, long, required_unless_present = "preset")]
    template: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,
}

fn parse_condition(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, expr)| (key.trim().to_string(), expr.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=EXPR, got '{raw}'"))
}

fn init_tracing(verbosity: u8) -> anyhow::Result<()> {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Scan(args) => ScanStrategy.execute(ScanInput {
            preset: args.preset,
            ini: args.ini,
            template: args.template,
            output: args.output,
            compact: args.compact,
        }),
        Commands::Check { ini, tags, entries } => {
            CheckStrategy.execute(CheckInput { ini, tags, entries })
        }
        Commands::Init => InitStrategy.execute(()),
        Commands::Info => InfoStrategy.execute(()),
        Commands::Version => VersionStrategy.execute(()),
    }
}
