//! # Algorithm Module
//!
//! `C9`: the four interface-advancement drivers. Each driver runs a
//! single proxy's share of trials against one [`InterfaceTable`] and
//! one [`SimulatorFacade`], accumulating into a [`ResultStore`]; the
//! per-instance controller ([`crate::instance`]) is responsible for
//! running one driver per proxy thread and merging their result stores
//! through [`crate::comm`].
//!
//! - [`direct`]: wave-based, gathering and decimating a shared
//!   ensemble at every interface (`ffs_direct.c`).
//! - [`branched`]: a full recursive tree of descendants per initial
//!   trial, implicit in the call stack (`ffs_branched.c`).
//! - [`rosenbluth`]: one random descendant line per initial trial, with
//!   a Rosenbluth weight (`ffs_rosenbluth.c`).
//! - [`bruteforce`]: a direct (unbiased) simulation used to validate
//!   the rate estimate from the other three, with no interface
//!   machinery at all.

pub mod branched;
pub mod bruteforce;
pub mod direct;
pub mod rosenbluth;

use crate::error::FfsError;
use crate::facade::{SimulatorFacade, StateOp};
use crate::interface::InterfaceTable;
use crate::pruning::prune;
use crate::rng::Lcg;
use crate::state::StateRef;
use crate::trial::{advance_to_lambda, TrialStatus};

/// Step-budget parameters shared by every driver's forward-run calls.
#[derive(Debug, Clone, Copy)]
pub struct StepBudget {
    pub nsteplambda: usize,
    pub nstepmax: usize,
}

/// Outcome of one forward trial attempt, including a possible pruning
/// retreat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrialOutcome {
    pub status: TrialStatus,
    pub weight: f64,
    /// Set only when `status` is `Pruned` or `TimedOut` *via pruning*:
    /// the interface the retreat was finally charged against. `None`
    /// when the trial succeeded or timed out without ever invoking
    /// pruning.
    pub pruned_at: Option<usize>,
    /// Meaningful only when `status` is `Pruned`: true if the retreat
    /// was chopped by exhausting its backward-going retries rather than
    /// by the dice roll or having no eligible retreat at all.
    pub back: bool,
}

/// Runs one forward trial from `state_ref` toward `interfaces[interface
/// + 1]`, falling back to [`prune`] if it goes backward or times out.
pub(crate) fn run_one_trial(
    facade: &mut dyn SimulatorFacade,
    interfaces: &InterfaceTable,
    interface: usize,
    state_ref: StateRef,
    rng: &mut Lcg,
    budget: StepBudget,
) -> Result<TrialOutcome, FfsError> {
    facade.state(StateOp::Read, state_ref)?;
    let seed = rng.next_seed32();
    facade.info(crate::facade::InfoTopic::RngSeedPut, seed as i64)?;

    let lambda_min = interfaces.lambda(interface - 1);
    let lambda_max = interfaces.lambda(interface + 1);

    let status = advance_to_lambda(
        facade,
        lambda_min,
        lambda_max,
        budget.nsteplambda,
        budget.nstepmax,
    )?;

    if status == TrialStatus::WentBackward || status == TrialStatus::TimedOut {
        let outcome = prune(
            facade,
            interfaces,
            interface,
            rng,
            budget.nsteplambda,
            budget.nstepmax,
        )?;
        return Ok(TrialOutcome {
            status: outcome.status,
            weight: outcome.weight_factor,
            pruned_at: Some(outcome.pruned_at),
            back: outcome.back,
        });
    }

    Ok(TrialOutcome {
        status,
        weight: 1.0,
        pruned_at: None,
        back: false,
    })
}
