//! Brute-force validation: a single long unbiased trajectory, with no
//! interface machinery at all, used to sanity-check the rate estimate
//! the biased algorithms produce. Tracks entries into the `B`-side
//! basin from `A`-or-transition region and the time spent there since
//! the last such entry, the same event bookkeeping as
//! `ffs_brute_force_run`.

use crate::error::FfsError;
use crate::facade::{ExecuteOp, SimulatorFacade};

/// A single observed `A -> B` crossing event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingEvent {
    /// Simulator time at which the trajectory left the `A`/transition
    /// region and entered `B`.
    pub t_enter_b: f64,
    /// Simulator time at which it was observed still in `B` for the
    /// reporting step (== `t_enter_b` the first frame it is recorded).
    pub t_observed: f64,
}

/// Result of one brute-force run.
#[derive(Debug, Clone)]
pub struct BruteForceResult {
    pub crossings: Vec<CrossingEvent>,
    pub total_time: f64,
}

impl BruteForceResult {
    /// A crude rate estimate: crossings observed per unit simulated
    /// time, for comparison against `Φ_A * P(B|A)` from a biased run.
    pub fn rate_estimate(&self) -> f64 {
        if self.total_time <= 0.0 {
            0.0
        } else {
            self.crossings.len() as f64 / self.total_time
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Region {
    A,
    Transition,
    B,
}

fn region_of(lambda: f64, lambda_a: f64, lambda_b: f64) -> Region {
    if lambda < lambda_a {
        Region::A
    } else if lambda > lambda_b {
        Region::B
    } else {
        Region::Transition
    }
}

/// Runs a single unbiased trajectory for up to `t_max` simulated time
/// units, `nsteplambda` internal steps between each lambda check.
pub fn run(
    facade: &mut dyn SimulatorFacade,
    lambda_a: f64,
    lambda_b: f64,
    nsteplambda: usize,
    t_max: f64,
) -> Result<BruteForceResult, FfsError> {
    facade.execute(ExecuteOp::Init)?;

    let mut lambda_old = facade.lambda()?;
    let mut region_old = region_of(lambda_old, lambda_a, lambda_b);
    let mut t = facade.time()?;
    let mut crossings = Vec::new();

    while t < t_max {
        for _ in 0..nsteplambda {
            facade.execute(ExecuteOp::Run)?;
        }
        let lambda = facade.lambda()?;
        t = facade.time()?;
        let region = region_of(lambda, lambda_a, lambda_b);

        if region_old != Region::B && region == Region::B {
            crossings.push(CrossingEvent {
                t_enter_b: t,
                t_observed: t,
            });
        }

        lambda_old = lambda;
        region_old = region;
    }
    let _ = lambda_old;

    facade.execute(ExecuteOp::Finish).ok();

    Ok(BruteForceResult {
        crossings,
        total_time: t,
    })
}
