//! Aurora CLI - bounded-unsat enumeration and local search over DIMACS
//! CNF inputs.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aurora")]
#[command(author, version, about = "Parallel bounded-unsat SAT solvers", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate all assignments within an unsat bound (exact)
    Dpll(commands::dpll::DpllArgs),
    /// Randomized local search with restarts (incomplete)
    Walk(commands::walk::WalkArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Dpll(args) => commands::dpll::run(args),
        Commands::Walk(args) => commands::walk::run(args),
    }
}
