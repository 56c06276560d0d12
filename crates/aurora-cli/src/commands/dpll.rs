//! The exact enumeration command.

use aurora_dist::LocalTransport;
use aurora_dpll::{DpllConfig, DpllSolver, Enumeration};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args)]
pub struct DpllArgs {
    /// Input DIMACS CNF file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Emit every assignment falsifying at most this many clauses
    #[arg(short = 'u', long, default_value_t = 0)]
    pub max_unsat: u32,

    /// Worker threads per rank (0 = hardware parallelism)
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Retain at most this many distinct solutions
    #[arg(long)]
    pub max_solutions: Option<usize>,

    /// Simulate this many cooperating ranks over the loopback transport
    /// (0 = plain intra-process solve)
    #[arg(long, default_value_t = 0)]
    pub ranks: usize,

    /// Emit a JSON report instead of plain lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DpllReport {
    num_solutions: usize,
    complete: bool,
    stats: aurora_dpll::DpllStats,
    solutions: Vec<String>,
}

pub fn run(args: DpllArgs) -> anyhow::Result<()> {
    let formula = super::load_formula(&args.input)?;
    let config = DpllConfig {
        max_unsat: args.max_unsat,
        threads: args.threads,
        max_solutions: args.max_solutions,
        stop_after: None,
    };

    let start = Instant::now();
    let result = if args.ranks > 1 {
        solve_simulated(&formula, &config, args.ranks)?
    } else {
        DpllSolver::new(formula, config).solve()?
    };
    let elapsed = start.elapsed();

    if args.json {
        let report = DpllReport {
            num_solutions: result.solutions.len(),
            complete: result.complete,
            stats: result.stats.clone(),
            solutions: result.solutions.iter().map(ToString::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        super::print_solutions(&result.solutions);
        println!("c {} solutions", result.solutions.len());
        if !result.complete {
            println!("c partial results: search was stopped early");
        }
        println!("c time: {:.3}s", elapsed.as_secs_f64());
    }

    Ok(())
}

/// Runs the distributor over the in-process loopback, one thread per
/// rank; rank 0's merged result is the answer.
fn solve_simulated(
    formula: &std::sync::Arc<aurora_format::Formula>,
    config: &DpllConfig,
    ranks: usize,
) -> anyhow::Result<Enumeration> {
    let endpoints = LocalTransport::create(ranks);
    let mut handles = Vec::with_capacity(ranks);
    for transport in endpoints {
        let formula = std::sync::Arc::clone(formula);
        let config = config.clone();
        handles.push(std::thread::spawn(move || {
            aurora_dist::solve(&transport, &formula, &config)
        }));
    }
    let mut rank0 = None;
    for (rank, handle) in handles.into_iter().enumerate() {
        let result = handle.join().expect("rank thread panicked")?;
        if rank == 0 {
            rank0 = Some(result);
        }
    }
    Ok(rank0.expect("rank 0 result missing"))
}
