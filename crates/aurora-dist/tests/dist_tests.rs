//! End-to-end tests for the distributed enumerator over the loopback
//! transport.

use aurora_base::XorShift64;
use aurora_dist::{solve, LocalTransport};
use aurora_dpll::{DpllConfig, DpllSolver, Enumeration};
use aurora_format::{DimacsCnf, Formula};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn formula(text: &str) -> Arc<Formula> {
    Arc::new(Formula::from_dimacs(&DimacsCnf::parse(text).unwrap()).unwrap())
}

fn random_3sat(num_vars: u32, num_clauses: usize, seed: u64) -> Arc<Formula> {
    let mut rng = XorShift64::new(seed);
    let mut clauses = Vec::with_capacity(num_clauses);
    while clauses.len() < num_clauses {
        let mut clause: Vec<i32> = Vec::with_capacity(3);
        while clause.len() < 3 {
            let var = rng.next_below(num_vars as usize) as i32 + 1;
            let lit = if rng.next_u64() & 1 == 1 { var } else { -var };
            if !clause.contains(&lit) && !clause.contains(&-lit) {
                clause.push(lit);
            }
        }
        clauses.push(clause);
    }
    Arc::new(
        Formula::from_dimacs(&DimacsCnf {
            num_vars: num_vars as usize,
            clauses,
        })
        .unwrap(),
    )
}

/// Runs all ranks as threads and returns rank 0's merged result.
fn solve_distributed(f: &Arc<Formula>, config: &DpllConfig, ranks: usize) -> Enumeration {
    let endpoints = LocalTransport::create(ranks);
    let handles: Vec<_> = endpoints
        .into_iter()
        .map(|transport| {
            let f = Arc::clone(f);
            let config = config.clone();
            thread::spawn(move || solve(&transport, &f, &config).unwrap())
        })
        .collect();
    let mut results: Vec<Enumeration> = handles
        .into_iter()
        .map(|h| h.join().expect("rank panicked"))
        .collect();
    results.swap_remove(0)
}

fn solution_set(result: &Enumeration) -> HashSet<Vec<u64>> {
    result
        .solutions
        .iter()
        .map(|s| s.bits().to_vec())
        .collect()
}

fn config(max_unsat: u32) -> DpllConfig {
    DpllConfig {
        max_unsat,
        threads: 2,
        ..DpllConfig::default()
    }
}

#[test]
fn test_matches_single_process_enumeration() {
    let f = random_3sat(9, 32, 0xD157);
    let reference = DpllSolver::new(Arc::clone(&f), config(1)).solve().unwrap();
    let distributed = solve_distributed(&f, &config(1), 3);
    assert_eq!(solution_set(&distributed), solution_set(&reference));
}

#[test]
fn test_unsatisfiable_terminates_across_ranks() {
    let f = formula(
        "p cnf 6 9\n\
         1 2 0\n3 4 0\n5 6 0\n\
         -1 -3 0\n-1 -5 0\n-3 -5 0\n\
         -2 -4 0\n-2 -6 0\n-4 -6 0\n",
    );
    let result = solve_distributed(&f, &config(0), 2);
    assert!(result.solutions.is_empty());
    assert!(result.complete);
}

#[test]
fn test_free_formula_counts_all_assignments() {
    let f = formula("p cnf 5 0\n");
    let result = solve_distributed(&f, &config(0), 4);
    assert_eq!(result.solutions.len(), 32);
}

#[test]
fn test_world_of_one_behaves_like_local_solve() {
    let f = formula("p cnf 2 2\n1 2 0\n-1 -2 0\n");
    let result = solve_distributed(&f, &config(0), 1);
    assert_eq!(result.solutions.len(), 2);
}
