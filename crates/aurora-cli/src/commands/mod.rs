//! CLI subcommands.

pub mod dpll;
pub mod walk;

use aurora_base::Solution;
use aurora_format::{DimacsCnf, Formula};
use std::path::Path;
use std::sync::Arc;

/// Loads and compiles a DIMACS file.
pub fn load_formula(path: &Path) -> anyhow::Result<Arc<Formula>> {
    let content = std::fs::read_to_string(path)?;
    let cnf = DimacsCnf::parse(&content)?;
    tracing::info!(
        path = %path.display(),
        num_vars = cnf.num_vars,
        num_clauses = cnf.clauses.len(),
        "loaded DIMACS input"
    );
    Ok(Arc::new(Formula::from_dimacs(&cnf)?))
}

/// Prints solutions one per line: the unsat count, the signed literals,
/// and a terminating `0`.
pub fn print_solutions(solutions: &[Solution]) {
    for solution in solutions {
        println!("{solution}");
    }
}
