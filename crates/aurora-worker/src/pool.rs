//! The intra-process worker pool.
//!
//! A pool of `T` workers, each owning a [`StealDeque`] of pending work
//! items. Workers execute their own deque LIFO and steal FIFO from peers
//! when it runs dry. Quiescence is detected with a single outstanding-item
//! count: an item is counted when it is pushed and released when its
//! handler returns, so the count reaching zero means no work is queued
//! *or* running anywhere.
//!
//! The pool can be re-armed by injecting more work after it quiesces,
//! which is what the inter-process distributor does with stolen branches.

use crate::deque::StealDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handles one work item on a worker thread.
///
/// Implementations keep per-worker state (the DPLL search context lives
/// here); new branches produced while handling go back through the
/// [`Scope`].
pub trait WorkHandler<T>: Send {
    /// Processes one item to completion.
    fn handle(&mut self, item: T, scope: &Scope<'_, T>);
}

struct CoordState {
    /// Items pushed but not yet fully processed.
    pending: usize,
    shutdown: bool,
}

struct Shared<T> {
    deques: Vec<StealDeque<T>>,
    coord: Mutex<CoordState>,
    signal: Condvar,
    stop: AtomicBool,
    inject_cursor: AtomicUsize,
}

impl<T> Shared<T> {
    fn add_pending(&self) {
        self.coord.lock().unwrap().pending += 1;
    }

    fn finish_one(&self) {
        let mut st = self.coord.lock().unwrap();
        st.pending -= 1;
        if st.pending == 0 {
            self.signal.notify_all();
        }
    }
}

/// The worker's handle back into the pool.
pub struct Scope<'a, T> {
    shared: &'a Shared<T>,
    worker: usize,
}

impl<T> Scope<'_, T> {
    /// Pushes a new branch onto this worker's own deque.
    pub fn push(&self, item: T) {
        self.shared.add_pending();
        self.shared.deques[self.worker].push_back(item);
        self.shared.signal.notify_one();
    }

    /// Whether a cooperative stop has been requested.
    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.shared.stop.load(Ordering::Relaxed)
    }

    /// Requests a cooperative stop of the whole pool, e.g. when a
    /// caller-supplied stop predicate is met mid-item.
    pub fn request_stop(&self) {
        self.shared.stop.store(true, Ordering::Relaxed);
        self.shared.signal.notify_all();
    }

    /// This worker's index within the pool.
    #[must_use]
    pub fn worker_id(&self) -> usize {
        self.worker
    }
}

/// Work-stealing worker pool.
pub struct WorkerPool<T> {
    shared: Arc<Shared<T>>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Spawns `threads` workers. The factory is called once per worker to
    /// build its handler (and with it any per-worker solver state).
    pub fn new<H, F>(threads: usize, factory: F) -> Self
    where
        H: WorkHandler<T> + 'static,
        F: FnMut(usize) -> H,
    {
        assert!(threads > 0, "pool needs at least one worker");
        let shared = Arc::new(Shared {
            deques: (0..threads).map(|_| StealDeque::new()).collect(),
            coord: Mutex::new(CoordState {
                pending: 0,
                shutdown: false,
            }),
            signal: Condvar::new(),
            stop: AtomicBool::new(false),
            inject_cursor: AtomicUsize::new(0),
        });

        let mut factory = factory;
        let workers = (0..threads)
            .map(|id| {
                let shared = shared.clone();
                let handler = factory(id);
                thread::Builder::new()
                    .name(format!("aurora-worker-{id}"))
                    .spawn(move || worker_loop(id, shared, handler))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self { shared, workers }
    }

    /// Injects a work item from outside the pool, re-arming it if it had
    /// quiesced.
    pub fn inject(&self, item: T) {
        let n = self.shared.deques.len();
        let slot = self.shared.inject_cursor.fetch_add(1, Ordering::Relaxed) % n;
        self.shared.add_pending();
        self.shared.deques[slot].push_back(item);
        self.shared.signal.notify_all();
    }

    /// Removes one pending branch from a deque front, for shipping to a
    /// remote peer. The item leaves this pool's accounting entirely.
    pub fn try_steal(&self) -> Option<T> {
        for deque in &self.shared.deques {
            if let Some(item) = deque.pop_front() {
                self.shared.finish_one();
                return Some(item);
            }
        }
        None
    }

    /// Whether no work is queued or running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.shared.coord.lock().unwrap().pending == 0
    }

    /// Blocks until the pool quiesces or a stop is requested. Returns
    /// `true` on quiescence, `false` when stopped first.
    pub fn wait_idle(&self) -> bool {
        let mut st = self.shared.coord.lock().unwrap();
        while st.pending > 0 && !self.shared.stop.load(Ordering::Relaxed) {
            let (next, _) = self
                .shared
                .signal
                .wait_timeout(st, Duration::from_millis(50))
                .unwrap();
            st = next;
        }
        st.pending == 0
    }

    /// Requests a cooperative stop. Workers finish their current check
    /// point and park; pending items are left unprocessed.
    pub fn stop(&self) {
        tracing::debug!("cooperative stop requested");
        self.shared.stop.store(true, Ordering::Relaxed);
        self.shared.signal.notify_all();
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.stop.load(Ordering::Relaxed)
    }

    /// Shuts the pool down and joins all workers.
    pub fn join(self) {
        {
            let mut st = self.shared.coord.lock().unwrap();
            st.shutdown = true;
            self.shared.signal.notify_all();
        }
        for worker in self.workers {
            let _ = worker.join();
        }
    }
}

fn worker_loop<T, H: WorkHandler<T>>(id: usize, shared: Arc<Shared<T>>, mut handler: H) {
    let scope = Scope {
        shared: shared.as_ref(),
        worker: id,
    };
    let n = shared.deques.len();

    loop {
        if shared.stop.load(Ordering::Relaxed) {
            if park_until_shutdown(&shared) {
                return;
            }
            continue;
        }

        // Own work first, then steal round-robin from the fronts.
        let item = shared.deques[id].pop_back().or_else(|| {
            (1..n).find_map(|k| shared.deques[(id + k) % n].pop_front())
        });

        match item {
            Some(item) => {
                handler.handle(item, &scope);
                shared.finish_one();
            }
            None => {
                let mut st = shared.coord.lock().unwrap();
                if st.shutdown {
                    return;
                }
                // Re-check under the lock so a push between the scan and
                // here cannot be missed, then park.
                if st.pending > 0 && !all_empty(&shared) {
                    continue;
                }
                let (next, _) = shared
                    .signal
                    .wait_timeout(st, Duration::from_millis(50))
                    .unwrap();
                st = next;
                if st.shutdown {
                    return;
                }
            }
        }
    }
}

fn all_empty<T>(shared: &Shared<T>) -> bool {
    shared.deques.iter().all(StealDeque::is_empty)
}

/// Parks a stopped worker until shutdown. Returns `true` on shutdown.
fn park_until_shutdown<T>(shared: &Shared<T>) -> bool {
    let st = shared.coord.lock().unwrap();
    if st.shutdown {
        return true;
    }
    let (st, _) = shared
        .signal
        .wait_timeout(st, Duration::from_millis(50))
        .unwrap();
    st.shutdown
}
