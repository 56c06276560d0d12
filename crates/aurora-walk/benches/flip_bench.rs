//! Walk-SAT kernel benchmarks.
//!
//! Run with: cargo bench -p aurora-walk

use aurora_base::XorShift64;
use aurora_format::{DimacsCnf, Formula};
use aurora_walk::{WalkConfig, WalkSat};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Random 3-SAT with a planted satisfying assignment, so the kernel is
/// guaranteed to terminate without a cutoff.
fn planted_3sat(num_vars: u32, num_clauses: usize, seed: u64) -> Arc<Formula> {
    let mut rng = XorShift64::new(seed);
    let hidden: Vec<bool> = (0..num_vars).map(|_| rng.next_u64() & 1 == 1).collect();
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
        let satisfied = clause
            .iter()
            .any(|&l| (l > 0) == hidden[l.unsigned_abs() as usize - 1]);
        if !satisfied {
            let fix = rng.next_below(3);
            clause[fix] = -clause[fix];
        }
        clauses.push(clause);
    }
    let cnf = DimacsCnf {
        num_vars: num_vars as usize,
        clauses,
    };
    Arc::new(Formula::from_dimacs(&cnf).unwrap())
}

fn bench_walk_rounds(c: &mut Criterion) {
    let formula = planted_3sat(100, 420, 0xBEE5);
    c.bench_function("walk_100v_420c", |b| {
        b.iter(|| {
            let mut kernel = WalkSat::new(
                formula.clone(),
                WalkConfig {
                    max_steps: 2000,
                    seed: 99,
                    ..WalkConfig::default()
                },
                99,
            );
            let stop = AtomicBool::new(false);
            let mut found = 0u32;
            kernel.run(&stop, |_| found += 1);
            black_box((found, kernel.flips()))
        });
    });
}

criterion_group!(benches, bench_walk_rounds);
criterion_main!(benches);
