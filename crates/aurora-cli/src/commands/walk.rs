//! The local-search command.

use aurora_walk::WalkConfig;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Args)]
pub struct WalkArgs {
    /// Input DIMACS CNF file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Flips per restart round (0 = restart immediately)
    #[arg(short, long)]
    pub max_steps: u64,

    /// Random-walk probability in [0, 1]
    #[arg(short, long, default_value_t = 0.5)]
    pub noise: f64,

    /// Accept assignments falsifying at most this many clauses
    #[arg(short = 'u', long, default_value_t = 0)]
    pub max_unsat: u32,

    /// PRNG seed (0 = seed from OS entropy)
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Wall-clock budget in seconds (0 = stop at the first solution)
    #[arg(short, long, default_value_t = 0.0)]
    pub cutoff_secs: f64,

    /// Independent search threads
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Emit a JSON report instead of plain lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct WalkJsonReport {
    found: bool,
    num_solutions: usize,
    flips: u64,
    restarts: u64,
    solutions: Vec<String>,
}

pub fn run(args: WalkArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&args.noise),
        "noise must lie in [0, 1]"
    );
    let formula = super::load_formula(&args.input)?;
    let config = WalkConfig {
        max_steps: args.max_steps,
        noise: args.noise,
        target_unsat: args.max_unsat,
        seed: args.seed,
        cutoff: Duration::from_secs_f64(args.cutoff_secs),
        threads: args.threads,
    };

    let start = Instant::now();
    let report = aurora_walk::solve(&formula, &config)?;
    let elapsed = start.elapsed();

    if args.json {
        let json = WalkJsonReport {
            found: report.found(),
            num_solutions: report.solutions.len(),
            flips: report.flips,
            restarts: report.restarts,
            solutions: report.solutions.iter().map(ToString::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        super::print_solutions(&report.solutions);
        if report.found() {
            println!("c {} solutions", report.solutions.len());
        } else {
            println!("c no solution within cutoff");
        }
        println!(
            "c flips: {} restarts: {} time: {:.3}s",
            report.flips,
            report.restarts,
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}
