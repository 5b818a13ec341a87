//! # Result Store Module
//!
//! `C10`: per-interface trial counters and weight accumulators, plus
//! the reduction that turns them into `Φ_A`, `P(B|A)`, and the overall
//! rate `k_AB = Φ_A · P(B|A)`. Grounded in `ffs_result.c` /
//! `ffs_result_aflux.c` / `ffs_direct.c: ffs_direct_results` /
//! `ffs_rosenbluth.c: ffs_rosenbluth_results`.

pub mod tests;

/// Per-interface counters accumulated over a wave (or the whole run,
/// for algorithms without discrete waves).
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct InterfaceCounters {
    /// Forward trials launched *from* this interface.
    pub ntrial: u64,
    /// Trials that successfully reached the *next* interface.
    pub nsuccess: u64,
    /// Trials chopped outright by a pruning dice-roll, or with no
    /// retreat attempted at all (interfaces 1 and 2 are never eligible
    /// for amplification).
    pub nprune: u64,
    /// Trials whose pruning retreat exhausted every eligible interface
    /// while still going backward on its last retry, as opposed to
    /// being chopped by the dice roll or finally timing out. A
    /// sub-bucket of what the reference's `nprune` column lumps
    /// together; see `pruning::PruneOutcome::back`.
    pub back: u64,
    /// Trials that timed out while attempting to reach the next
    /// interface.
    pub nto: u64,
    /// Sum of weights of trials that reached this interface (`wt` in
    /// the reference's two-column Rosenbluth accounting; used directly
    /// by direct/branched too, where there is only one accumulator).
    pub weight: f64,
    /// Sum of success-weighted tallies launched *from* this interface
    /// (`swt`): Rosenbluth-only, accumulated after a launching
    /// interface's trials finish, at the same index as `weight`'s
    /// incoming-weight accumulation for that interface.
    pub success_weight: f64,
    /// States physically kept (harvested) at this interface after any
    /// decimation.
    pub nkeep: u64,
}

/// Accumulated initial-flux statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FluxTotals {
    pub ncross: u64,
    pub time: f64,
}

/// Which per-algorithm `P(B|A)` estimator to apply when reducing a
/// store. Each driver accumulates weight differently (spec.md §4.4.1 —
/// §4.4.3), so the same counters cannot be folded by one formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimator {
    /// Product of per-interface ratios `weight_n / ntrial_{n-1}`.
    Direct,
    /// `weight_sum[N] / number of initial starting points`.
    Branched,
    /// Product of per-interface ratios `success_weight_n / weight_n`.
    Rosenbluth,
}

/// The complete per-instance result set: one [`InterfaceCounters`] per
/// interface (`1..=nlambda`), plus the flux totals.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResultStore {
    counters: Vec<InterfaceCounters>,
    #[serde(skip)]
    flux: FluxTotals,
}

impl ResultStore {
    /// Creates an all-zero store sized for `nlambda` interfaces.
    pub fn new(nlambda: usize) -> Self {
        ResultStore {
            counters: vec![InterfaceCounters::default(); nlambda],
            flux: FluxTotals::default(),
        }
    }

    fn slot(&mut self, interface: usize) -> &mut InterfaceCounters {
        &mut self.counters[interface - 1]
    }

    pub fn get(&self, interface: usize) -> InterfaceCounters {
        self.counters[interface - 1]
    }

    pub fn add_trial(&mut self, interface: usize, n: u64) {
        self.slot(interface).ntrial += n;
    }

    pub fn add_success(&mut self, interface: usize) {
        self.slot(interface).nsuccess += 1;
    }

    pub fn add_prune(&mut self, interface: usize) {
        self.slot(interface).nprune += 1;
    }

    pub fn add_back(&mut self, interface: usize) {
        self.slot(interface).back += 1;
    }

    pub fn add_timeout(&mut self, interface: usize, n: u64) {
        self.slot(interface).nto += n;
    }

    pub fn accumulate_weight(&mut self, interface: usize, wt: f64) {
        self.slot(interface).weight += wt;
    }

    pub fn accumulate_success_weight(&mut self, interface: usize, swt: f64) {
        self.slot(interface).success_weight += swt;
    }

    pub fn set_nkeep(&mut self, interface: usize, nkeep: u64) {
        self.slot(interface).nkeep = nkeep;
    }

    pub fn add_flux_crossing(&mut self) {
        self.flux.ncross += 1;
    }

    pub fn accumulate_flux_time(&mut self, time: f64) {
        self.flux.time += time;
    }

    pub fn flux_totals(&self) -> FluxTotals {
        self.flux
    }

    /// Merges another store's counters and flux totals in place,
    /// mirroring the collective all-reduce (sum) every algorithm driver
    /// performs across proxies.
    pub fn merge(&mut self, other: &ResultStore) {
        for (a, b) in self.counters.iter_mut().zip(other.counters.iter()) {
            a.ntrial += b.ntrial;
            a.nsuccess += b.nsuccess;
            a.nprune += b.nprune;
            a.back += b.back;
            a.nto += b.nto;
            a.weight += b.weight;
            a.success_weight += b.success_weight;
            a.nkeep += b.nkeep;
        }
        self.flux.ncross += other.flux.ncross;
        self.flux.time += other.flux.time;
    }

    /// Number of real interfaces this store was sized for.
    pub fn nlambda(&self) -> usize {
        self.counters.len()
    }

    /// `Φ_A = total crossings / total elapsed time`.
    pub fn initial_flux(&self) -> f64 {
        if self.flux.time <= 0.0 {
            0.0
        } else {
            self.flux.ncross as f64 / self.flux.time
        }
    }

    /// `P(B|A)`, dispatched to the estimator matching whichever
    /// algorithm driver produced this store.
    pub fn crossing_probability(&self, estimator: Estimator) -> f64 {
        match estimator {
            Estimator::Direct => self.crossing_probability_direct(),
            Estimator::Branched => self.crossing_probability_branched(),
            Estimator::Rosenbluth => self.crossing_probability_rosenbluth(),
        }
    }

    /// Product over interfaces `2..=nlambda` of `weight_n /
    /// ntrial_{n-1}`, clamped so a single interface's ratio can never
    /// exceed 1 (pruning can otherwise inflate accumulated weight past
    /// the raw trial count) and zeroed outright if any interface before
    /// the last produced no successes at all.
    fn crossing_probability_direct(&self) -> f64 {
        let nlambda = self.nlambda();
        let mut plambda = 1.0;
        for n in 1..=nlambda {
            if n > 1 {
                let ntry = self.counters[n - 2].ntrial as f64;
                let mut wt = self.counters[n - 1].weight;
                if ntry > 0.0 {
                    if wt > ntry {
                        wt = ntry;
                    }
                    plambda *= wt / ntry;
                }
            }
            if n < nlambda {
                let nsuccess_next = self.counters[n].nsuccess;
                if nsuccess_next == 0 {
                    plambda = 0.0;
                }
            }
        }
        plambda
    }

    /// `weight_sum[N] / number of initial starting points` (spec.md
    /// §4.4.2). `weight_sum[N]` is `counters[nlambda-1].weight`, since
    /// the branched driver accumulates incoming weight at *every*
    /// interface a branch reaches, including the last; the starting
    /// point count is interface 1's `nkeep`.
    fn crossing_probability_branched(&self) -> f64 {
        let nlambda = self.nlambda();
        let starts = self.counters[0].nkeep as f64;
        if starts <= 0.0 {
            return 0.0;
        }
        self.counters[nlambda - 1].weight / starts
    }

    /// Product over interfaces `1..nlambda` of `success_weight_n /
    /// weight_n` (spec.md §4.4.3 / §4.7), zeroed if any interface never
    /// received any incoming weight at all.
    fn crossing_probability_rosenbluth(&self) -> f64 {
        let nlambda = self.nlambda();
        let mut plambda = 1.0;
        for n in 1..nlambda {
            let wt = self.counters[n - 1].weight;
            if wt <= 0.0 {
                return 0.0;
            }
            plambda *= self.counters[n - 1].success_weight / wt;
        }
        plambda
    }

    /// `k_AB = Φ_A · P(B|A)`.
    pub fn rate(&self, estimator: Estimator) -> f64 {
        self.initial_flux() * self.crossing_probability(estimator)
    }
}
