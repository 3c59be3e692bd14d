use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use esports_assembly::assembly::DEFAULT_WIN_ODDS;
use esports_assembly::pipeline::{self, PipelineConfig};
use esports_assembly::summary::{self, SummaryArgs as SummaryRequest};
use esports_assembly::{export, source};

#[derive(Parser, Debug)]
#[command(
    name = "esports-assembly",
    about = "Assemble esports per-player game exports into matches and fact tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline over a CSV export and write the results
    Assemble(AssembleArgs),
    /// Summarize a player match stats parquet file
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct AssembleArgs {
    /// CSV export, one row per player per game
    #[arg(long)]
    input: PathBuf,

    /// Directory for the JSON (and optional parquet) output
    #[arg(long = "out-dir", default_value = "out")]
    out_dir: PathBuf,

    /// Also write the fact tables as parquet
    #[arg(long)]
    parquet: bool,

    /// Game length in minutes used for career CS per minute
    #[arg(long = "assumed-game-minutes", default_value_t = pipeline::DEFAULT_GAME_MINUTES)]
    assumed_game_minutes: f64,

    /// Blue-side odds when neither team has a recorded win
    #[arg(long = "default-odds", default_value_t = DEFAULT_WIN_ODDS)]
    default_odds: f64,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// player_match_stats.parquet written by `assemble --parquet`
    #[arg(long = "player-parquet")]
    player_parquet: PathBuf,

    /// Only scan the first N rows
    #[arg(long = "max-rows")]
    max_rows: Option<usize>,

    /// Print per-role averages
    #[arg(long = "by-role")]
    by_role: bool,

    /// Print the K most played champions
    #[arg(long = "top-champions")]
    top_champions: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("esports_assembly=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Assemble(args) => assemble(args),
        Command::Summary(args) => summary::summarize_players(SummaryRequest {
            player_parquet: &args.player_parquet,
            max_rows: args.max_rows,
            by_role: args.by_role,
            top_champions: args.top_champions,
        }),
    }
}

fn assemble(args: AssembleArgs) -> Result<()> {
    let rows = source::read_csv(&args.input)?;
    info!(rows = rows.len(), input = %args.input.display(), "read export");

    let config = PipelineConfig {
        assumed_game_minutes: args.assumed_game_minutes,
        default_odds: args.default_odds,
    };
    let assembly = pipeline::run(rows, &config)
        .with_context(|| format!("assembling {}", args.input.display()))?;

    let mut written = export::write_assembly_json(&args.out_dir, &assembly)?;
    if args.parquet {
        written.extend(export::write_fact_parquet(&args.out_dir, &assembly)?);
    }

    for path in &written {
        info!(path = %path.display(), "wrote");
    }
    println!(
        "{} matches, {} teams, {} players, {} diagnostics -> {}",
        assembly.matches.len(),
        assembly.teams.len(),
        assembly.players.len(),
        assembly.diagnostics.len(),
        args.out_dir.display()
    );

    Ok(())
}
