//! # Initial Flux Module
//!
//! `C8`: estimates the initial flux `Φ_A` by running a long trajectory
//! confined near state `A` and counting how often it crosses interface
//! 1 going forward, per unit time — a direct translation of
//! `ffs_trial_init`.
//!
//! Three details carried over from the reference implementation are
//! easy to get wrong in a straightforward reading of the spec, so they
//! are called out explicitly:
//!
//! - an "overshoot" past `lambda_b` restarts the equilibration segment
//!   from the saved initial state, rather than ending the run;
//! - the very first forward crossing after a restart only starts the
//!   elapsed-time clock — it does not itself count as a crossing, since
//!   there is no previous crossing to measure the interval from;
//! - a crossing is only countable once the trajectory has already run
//!   past the equilibration time `teq`.


use crate::error::FfsError;
use crate::facade::{ExecuteOp, SimulatorFacade, StateOp};
use crate::rng::Lcg;
use crate::state::StateRef;
use crate::trial::TrialStatus;

/// Parameters governing the initial-flux run.
#[derive(Debug, Clone, Copy)]
pub struct FluxParams {
    /// Equilibration time; crossings before this are not counted.
    pub teq: f64,
    /// Upper bound on the number of simulator steps.
    pub nstepmax: usize,
    /// Probability that a countable crossing is accepted as the end of
    /// this run (so consecutive initial states are decorrelated rather
    /// than adjacent in time).
    pub prob_accept: f64,
    /// When true, a fresh initial state is read before every run rather
    /// than only before the first of a back-to-back series — trading
    /// correlation between runs for independence.
    pub init_independent: bool,
    /// Only every `nskip`-th countable crossing is even considered for
    /// the `prob_accept` coin flip; the rest are counted toward the flux
    /// estimate but can never end the run. `0` is treated the same as
    /// `1` (every crossing is a candidate).
    pub nskip: u64,
}

/// Result of one initial-flux generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxOutcome {
    pub status: TrialStatus,
    /// Total simulated time attributable to the A-to-first-interface
    /// cycle, summed across any overshoot restarts within this run.
    pub elapsed_time: f64,
    /// Number of countable forward crossings of interface 1 observed.
    pub ncross: u64,
}

/// Runs one initial-flux generation trial, starting from `sinit` (read
/// only on the first trial of a proxy's series, or always when
/// `init_independent` is set) and producing a new state at interface 1
/// once a crossing is accepted.
#[allow(clippy::too_many_arguments)]
pub fn run_initial_flux(
    facade: &mut dyn SimulatorFacade,
    params: FluxParams,
    lambda_a: f64,
    lambda_b: f64,
    sinit: StateRef,
    trial_rng: &mut Lcg,
    traj_rng: &mut Lcg,
    trial_index: u64,
) -> Result<FluxOutcome, FfsError> {
    if trial_index == 1 || params.init_independent {
        read_initial_state(facade, sinit, traj_rng)?;
    }

    facade.execute(ExecuteOp::Run)?;
    let mut lambda_old = facade.lambda()?;

    let mut t0 = facade.time()?;
    let mut not_started = true;
    let mut t_elapsed = 0.0;
    let mut ncross = 0u64;

    let mut n = 0usize;
    while n < params.nstepmax {
        facade.execute(ExecuteOp::Run)?;
        let lambda = facade.lambda()?;
        let t1 = facade.time()?;

        if lambda >= lambda_b {
            if !not_started {
                t_elapsed += t1 - t0;
            }
            read_initial_state(facade, sinit, traj_rng)?;
            t0 = facade.time()?;
            lambda_old = facade.lambda()?;
            not_started = true;
            n += 1;
            continue;
        }

        let crossed = lambda_old < lambda_a && lambda >= lambda_a;
        if crossed && t1 >= params.teq {
            if not_started {
                not_started = false;
                t0 = t1;
            } else {
                ncross += 1;
                let t1b = facade.time()?;
                t_elapsed += t1b - t0;
                t0 = t1b;

                let nskip = params.nskip.max(1);
                let is_candidate = ncross % nskip == 0;
                if is_candidate && trial_rng.next_f64() < params.prob_accept {
                    n += 1;
                    lambda_old = lambda;
                    break;
                }
            }
        }

        lambda_old = lambda;
        n += 1;
    }

    let status = if n >= params.nstepmax {
        TrialStatus::TimedOut
    } else {
        TrialStatus::Succeeded
    };

    Ok(FluxOutcome {
        status,
        elapsed_time: t_elapsed,
        ncross,
    })
}

fn read_initial_state(
    facade: &mut dyn SimulatorFacade,
    sinit: StateRef,
    traj_rng: &mut Lcg,
) -> Result<(), FfsError> {
    facade.state(StateOp::Read, sinit)?;
    let seed = traj_rng.next_seed32();
    facade.info(crate::facade::InfoTopic::RngSeedPut, seed as i64)?;
    Ok(())
}

/// Reduces the per-proxy crossing counts and elapsed times collected
/// over one wave of initial-flux trials into a flux estimate,
/// `Φ_A = total_crossings / total_time`.
pub fn estimate_flux(total_crossings: u64, total_time: f64) -> f64 {
    if total_time <= 0.0 {
        0.0
    } else {
        total_crossings as f64 / total_time
    }
}
