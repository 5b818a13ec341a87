//! # Communicator Module
//!
//! A stand-in for the MPI communicator the reference implementation
//! runs its proxies over. Real inter-host transport is out of scope
//! (the reference tree itself ships a single-process MPI replacement
//! for exactly this situation, `src/missing/mpi.c`); [`LocalComm`]
//! plays the same role here, implementing the handful of collectives
//! the algorithm drivers actually need on top of
//! `std::thread::scope` and `std::sync::Barrier`.


use std::sync::{Arc, Barrier, Mutex};

/// How values from multiple proxies are combined in a reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Sum,
    Max,
    /// Logical OR over `{0.0, nonzero}`, used to propagate "did any
    /// proxy fail" flags.
    Or,
}

/// The collective operations an algorithm driver needs from a group of
/// proxies cooperating on one instance.
pub trait Communicator {
    /// This proxy's rank within the instance, `0..size()`.
    fn rank(&self) -> usize;

    /// Number of proxies in the instance.
    fn size(&self) -> usize;

    /// Combines `value` across all proxies with `op`, returning the
    /// same reduced value to every proxy (an all-reduce, not a
    /// single-root reduce, since every proxy needs the combined
    /// interface weight sums and error flags to proceed in lock-step).
    fn all_reduce(&self, value: f64, op: ReduceOp) -> f64;

    /// Gathers one `f64` per proxy, ordered by rank.
    fn all_gather(&self, value: f64) -> Vec<f64>;

    /// A two-phase collective error barrier: every proxy reports
    /// whether its local step failed; if any proxy reports failure,
    /// every proxy (including ones that locally succeeded) observes
    /// `Err` so the whole instance can abort in step rather than
    /// leaving proxies deadlocked waiting on each other's next
    /// collective.
    fn checked(&self, local_ok: bool) -> Result<(), ()> {
        let any_failed = self.all_reduce(if local_ok { 0.0 } else { 1.0 }, ReduceOp::Or) != 0.0;
        if any_failed { Err(()) } else { Ok(()) }
    }
}

struct SharedState {
    barrier: Barrier,
    scratch: Mutex<Vec<f64>>,
    gather: Mutex<Vec<f64>>,
}

/// A single-process communicator backing one instance's proxies with
/// OS threads, synchronized by a shared [`Barrier`].
///
/// Every collective call blocks until all `size()` proxies have called
/// the *same* collective; calling two different collectives out of
/// order across proxies deadlocks, exactly as a real MPI collective
/// mismatch would.
pub struct LocalComm {
    rank: usize,
    size: usize,
    shared: Arc<SharedState>,
}

impl LocalComm {
    /// Builds `size` communicators sharing one barrier, one per proxy
    /// rank, ready to be moved into `size` worker closures (e.g. via
    /// `std::thread::scope`).
    pub fn group(size: usize) -> Vec<LocalComm> {
        let shared = Arc::new(SharedState {
            barrier: Barrier::new(size),
            scratch: Mutex::new(vec![0.0; size]),
            gather: Mutex::new(vec![0.0; size]),
        });
        (0..size)
            .map(|rank| LocalComm {
                rank,
                size,
                shared: shared.clone(),
            })
            .collect()
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn all_reduce(&self, value: f64, op: ReduceOp) -> f64 {
        if self.size == 1 {
            return value;
        }
        {
            let mut scratch = self.shared.scratch.lock().unwrap();
            scratch[self.rank] = value;
        }
        self.shared.barrier.wait();
        let result = {
            let scratch = self.shared.scratch.lock().unwrap();
            match op {
                ReduceOp::Sum => scratch.iter().sum(),
                ReduceOp::Max => scratch.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                ReduceOp::Or => {
                    if scratch.iter().any(|&v| v != 0.0) {
                        1.0
                    } else {
                        0.0
                    }
                }
            }
        };
        // A second barrier stops a fast proxy from overwriting next
        // round's scratch slot before a slow proxy has read this one.
        self.shared.barrier.wait();
        result
    }

    fn all_gather(&self, value: f64) -> Vec<f64> {
        if self.size == 1 {
            return vec![value];
        }
        {
            let mut gather = self.shared.gather.lock().unwrap();
            gather[self.rank] = value;
        }
        self.shared.barrier.wait();
        let result = self.shared.gather.lock().unwrap().clone();
        self.shared.barrier.wait();
        result
    }
}
