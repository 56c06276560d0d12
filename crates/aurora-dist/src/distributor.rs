//! The per-rank distributor loop.
//!
//! Every rank runs a full intra-process pool; rank 0 seeds the root
//! branch. A rank whose pool quiesces asks a uniformly random peer for
//! work. Global termination is Dijkstra's token protocol: a rank turns
//! black when it ships work; only idle ranks forward the token,
//! blackening it if they are black and whitening themselves; rank 0
//! terminates when it is white, idle, and the token comes back white,
//! then broadcasts `Done`.
//!
//! Solutions cross ranks exactly once: after `Done`, each nonzero rank
//! sends its locally deduplicated set to rank 0 in one batch, so
//! solution traffic can never race the termination decision.

use crate::transport::Transport;
use aurora_base::{Error, Result, Solution, XorShift64};
use aurora_dpll::{
    DpllConfig, DpllWorker, Enumeration, SearchContext, SearchStats, WorkItem,
};
use aurora_format::Formula;
use aurora_protocol::{PeerCodec, PeerMessage, WireItem, WireSolution};
use aurora_worker::{resolve_threads, SinkConfig, SolutionSink, WorkerPool};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const IDLE_POLL: Duration = Duration::from_micros(200);

/// Runs the distributed enumeration on this rank.
///
/// Every rank returns; only rank 0's [`Enumeration`] carries the merged,
/// globally deduplicated solution set. Statistics are per-rank.
pub fn solve<T: Transport>(
    transport: &T,
    formula: &Arc<Formula>,
    config: &DpllConfig,
) -> Result<Enumeration> {
    let rank = transport.rank();
    let world = transport.world_size();
    let threads = resolve_threads(config.threads);

    let stats = Arc::new(SearchStats::default());
    let sink = SolutionSink::spawn(SinkConfig {
        channel_capacity: 1024,
        retain: None,
    });
    let pool = WorkerPool::new(threads, |_| {
        DpllWorker::from_context(
            SearchContext::new(Arc::clone(formula), config.max_unsat, Arc::clone(&stats)),
            sink.sender(),
            Arc::clone(&stats),
            None,
        )
    });

    if rank == 0 {
        pool.inject(WorkItem::root(config.max_unsat));
    }
    tracing::info!(rank, world, threads, "distributor started");

    let mut rng = XorShift64::new(0x5eed ^ rank as u64);
    let mut black = false;
    let mut steal_pending = false;
    let mut held_token: Option<bool> = None;
    let mut round_started = false;
    let mut finished = false;
    let mut steals = 0u64;

    while !finished {
        let mut progressed = false;

        // Drain everything delivered so far.
        while let Some((from, bytes)) = transport.try_recv()? {
            progressed = true;
            match PeerCodec::decode(&bytes)? {
                PeerMessage::StealRequest => {
                    let reply = match pool.try_steal() {
                        Some(item) => {
                            // Shipping work taints this rank for the
                            // current token round.
                            black = true;
                            tracing::debug!(rank, to = from, depth = item.depth(), "shed branch");
                            Some(WireItem {
                                decisions: item.to_wire(),
                                max_unsat: item.max_unsat,
                            })
                        }
                        None => None,
                    };
                    send(transport, from, &PeerMessage::StealReply(reply))?;
                }
                PeerMessage::StealReply(reply) => {
                    steal_pending = false;
                    if let Some(wire) = reply {
                        steals += 1;
                        pool.inject(WorkItem::from_wire(&wire.decisions, wire.max_unsat)?);
                    }
                }
                PeerMessage::Token { black: token_black } => {
                    held_token = Some(token_black);
                }
                PeerMessage::Done => {
                    finished = true;
                }
                PeerMessage::SolutionBatch(_) => {
                    return Err(Error::Transport(format!(
                        "rank {rank} received a solution batch before Done"
                    )));
                }
            }
        }
        if finished {
            break;
        }

        let idle = pool.is_idle();
        if idle && world == 1 {
            finished = true;
            break;
        }

        if idle {
            if rank == 0 {
                if let Some(token_black) = held_token.take() {
                    if !token_black && !black {
                        // A full white round over an idle ring: done.
                        for peer in 1..world {
                            send(transport, peer, &PeerMessage::Done)?;
                        }
                        finished = true;
                        break;
                    }
                    // Failed round: whiten and start over.
                    black = false;
                    send(transport, 1, &PeerMessage::Token { black: false })?;
                    progressed = true;
                } else if !round_started {
                    round_started = true;
                    send(transport, 1, &PeerMessage::Token { black: false })?;
                    progressed = true;
                }
            } else if let Some(token_black) = held_token.take() {
                send(
                    transport,
                    (rank + 1) % world,
                    &PeerMessage::Token {
                        black: token_black || black,
                    },
                )?;
                black = false;
                progressed = true;
            }
        }

        if !progressed {
            if idle && !steal_pending {
                let mut peer = rng.next_below(world - 1);
                if peer >= rank {
                    peer += 1;
                }
                send(transport, peer, &PeerMessage::StealRequest)?;
                steal_pending = true;
            }
            thread::sleep(IDLE_POLL);
        }
    }

    // Global quiescence: settle the local pool and close the sink.
    pool.wait_idle();
    pool.join();
    let report = sink.finish();
    tracing::info!(
        rank,
        local_solutions = report.solutions.len(),
        steals,
        "rank quiescent"
    );

    let solutions = if rank == 0 {
        collect_batches(transport, world, report.solutions)?
    } else {
        let batch: Vec<WireSolution> = report
            .solutions
            .iter()
            .map(|s| WireSolution {
                bits: s.bits().to_vec(),
                num_vars: s.num_vars(),
                unsat: s.unsat(),
            })
            .collect();
        send(transport, 0, &PeerMessage::SolutionBatch(batch))?;
        Vec::new()
    };

    transport.barrier()?;

    Ok(Enumeration {
        solutions,
        stats: stats.snapshot(),
        complete: true,
    })
}

/// Rank 0: merge every peer's batch into the local set, deduplicating
/// globally by assignment bit-pattern.
fn collect_batches<T: Transport>(
    transport: &T,
    world: usize,
    local: Vec<Solution>,
) -> Result<Vec<Solution>> {
    let mut seen: HashSet<Box<[u64]>> = local.iter().map(|s| s.bits().into()).collect();
    let mut merged = local;
    let mut batches = 0;

    while batches < world - 1 {
        match transport.try_recv()? {
            Some((_, bytes)) => match PeerCodec::decode(&bytes)? {
                PeerMessage::SolutionBatch(batch) => {
                    batches += 1;
                    for wire in batch {
                        if seen.insert(wire.bits.clone().into_boxed_slice()) {
                            merged.push(Solution::from_parts(
                                wire.bits,
                                wire.num_vars,
                                wire.unsat,
                            ));
                        }
                    }
                }
                // Stale steal/token traffic from the shutdown window;
                // nobody reads a reply anymore.
                _ => {}
            },
            None => thread::sleep(IDLE_POLL),
        }
    }
    Ok(merged)
}

fn send<T: Transport>(transport: &T, to: usize, msg: &PeerMessage) -> Result<()> {
    transport.send(to, PeerCodec::encode(msg)?)
}
