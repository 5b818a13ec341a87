//! # Ensemble Module
//!
//! `C5`: a collection of trajectories crossing a single interface,
//! tracked as parallel arrays of trial id and weight, the same layout
//! as the reference implementation's `ffs_ensemble_t` (`traj[]` /
//! `wt[]` with an `nsuccess` high-water mark). An ensemble only ever
//! grows by appending a successful trial; pruning and failure are not
//! recorded here — the interface table's own counters absorb those.


use crate::rng::Lcg;

/// One trial's position within an ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Member {
    pub trial_id: u64,
    pub weight: f64,
}

/// A weight-biased ensemble of successful crossings at one interface.
#[derive(Debug, Clone, Default)]
pub struct Ensemble {
    members: Vec<Member>,
}

impl Ensemble {
    /// An empty ensemble.
    pub fn new() -> Self {
        Ensemble {
            members: Vec::new(),
        }
    }

    /// Number of successful trajectories recorded so far.
    pub fn nsuccess(&self) -> usize {
        self.members.len()
    }

    /// Appends a successful trajectory with its weight.
    pub fn push(&mut self, trial_id: u64, weight: f64) {
        self.members.push(Member { trial_id, weight });
    }

    /// Sum of weights over all recorded trajectories.
    pub fn sum_weights(&self) -> f64 {
        self.members.iter().map(|m| m.weight).sum()
    }

    /// Draws one member index with probability proportional to its
    /// weight, via a prefix-sum walk over a single uniform deviate —
    /// the same algorithm as `ffs_ensemble_samplewt`.
    ///
    /// Returns `None` if the ensemble is empty or every weight is zero.
    pub fn sample_weight_biased(&self, rng: &mut Lcg) -> Option<usize> {
        if self.members.is_empty() {
            return None;
        }
        let total = self.sum_weights();
        if total <= 0.0 {
            return None;
        }
        let target = total * rng.next_f64();
        let mut running = 0.0;
        for (i, m) in self.members.iter().enumerate() {
            running += m.weight;
            if running >= target {
                return Some(i);
            }
        }
        // Floating-point rounding can leave `running` a hair under
        // `target`; the last member is the correct fallback.
        Some(self.members.len() - 1)
    }

    /// The member at `index`.
    pub fn get(&self, index: usize) -> Member {
        self.members[index]
    }

    /// Merges another proxy's ensemble into this one, as a stand-in for
    /// the collective all-gather every algorithm driver performs at a
    /// wave boundary. Order is not significant downstream since
    /// sampling only depends on the weight prefix sums.
    pub fn extend_from(&mut self, other: &Ensemble) {
        self.members.extend_from_slice(&other.members);
    }

    /// Iterates all members.
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }
}
