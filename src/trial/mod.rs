//! # Trial Module
//!
//! `C6`: the two primitives every algorithm driver builds trials out
//! of — run forward until a wall-clock-style time limit
//! ([`advance_to_time`]), and run forward until the order parameter
//! either reaches the next interface or falls back below the previous
//! one ([`advance_to_lambda`]). Both are direct translations of
//! `ffs_trial_run_to_time` / `ffs_trial_run_to_lambda`.


use crate::error::FfsError;
use crate::facade::{ExecuteOp, SimulatorFacade};

/// The outcome of a trial segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialStatus {
    /// Still advancing; only ever seen internally inside the
    /// `advance_to_lambda` loop, never returned to a caller.
    InProgress,
    /// Reached or passed the target lambda (or the equilibration time
    /// limit, for [`advance_to_time`]).
    Succeeded,
    /// Fell back to or below `lambda_min`.
    WentBackward,
    /// Exhausted the step budget without succeeding or going backward.
    TimedOut,
    /// Retreated to an earlier interface by the pruning protocol. Not
    /// produced by the primitives in this module directly — set by
    /// [`crate::pruning::prune`], which calls back into
    /// `advance_to_lambda`.
    Pruned,
    /// A facade call failed mid-segment; the trial is abandoned.
    Failed,
}

/// Runs the simulator forward in fixed steps until its internal clock
/// reaches `t_limit`, or `nstepmax` steps have elapsed, whichever comes
/// first — equivalent to `ffs_trial_run_to_time`.
///
/// Returns `Succeeded` if the time limit was reached, `TimedOut`
/// otherwise. Used only during equilibration / initial-flux generation,
/// where the "target" is a time, not an order-parameter value.
pub fn advance_to_time(
    facade: &mut dyn SimulatorFacade,
    t_limit: f64,
    nstepmax: usize,
) -> Result<TrialStatus, FfsError> {
    for _ in 0..=nstepmax {
        facade.execute(ExecuteOp::Run)?;
        let t = facade.time()?;
        if t >= t_limit {
            return Ok(TrialStatus::Succeeded);
        }
    }
    Ok(TrialStatus::TimedOut)
}

/// Runs the simulator forward, checking the order parameter every
/// `nsteplambda` internal steps, until one of three things happens:
/// the step budget `nstepmax` is exhausted (`TimedOut`), lambda falls
/// below `lambda_min` (`WentBackward`), or lambda reaches `lambda_max`
/// (`Succeeded`) — equivalent to `ffs_trial_run_to_lambda`.
///
/// When more than one condition holds at the same check, `Succeeded`
/// takes priority over `WentBackward`, which takes priority over
/// `TimedOut` — the exact precedence the reference implementation's
/// sequential (non-exclusive) `if` chain produces.
pub fn advance_to_lambda(
    facade: &mut dyn SimulatorFacade,
    lambda_min: f64,
    lambda_max: f64,
    nsteplambda: usize,
    nstepmax: usize,
) -> Result<TrialStatus, FfsError> {
    let mut nstep = 0usize;
    loop {
        let lambda = facade.lambda()?;

        let mut status = TrialStatus::InProgress;
        if nstep >= nstepmax {
            status = TrialStatus::TimedOut;
        }
        if lambda < lambda_min {
            status = TrialStatus::WentBackward;
        }
        if lambda >= lambda_max {
            status = TrialStatus::Succeeded;
        }

        if status != TrialStatus::InProgress {
            return Ok(status);
        }

        for _ in 0..nsteplambda {
            facade.execute(ExecuteOp::Run)?;
            nstep += 1;
        }
    }
}
