//! # Pruning Module
//!
//! `C7`: the biased-retreat protocol applied to a trial that fails to
//! progress, a direct translation of `ffs_trial_prune`. Rather than
//! discarding the trial outright, it walks back through earlier
//! interfaces, at each one either accepting the chop (probability
//! `pprune`) or surviving and re-attempting the forward run with its
//! weight amplified by `1 / (1 - pprune)`.
//!
//! Interfaces 1 and 2 are never eligible for the biased retreat: the
//! walk-back loop only considers `n > 2`, so a trial that reaches
//! interface 2 without surviving is always pruned there outright
//! (weight is never amplified past that point).


use crate::error::FfsError;
use crate::facade::SimulatorFacade;
use crate::interface::InterfaceTable;
use crate::rng::Lcg;
use crate::trial::{advance_to_lambda, TrialStatus};

/// Outcome of a pruning attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PruneOutcome {
    /// Final status after the retreat: `Pruned` if the trial was
    /// chopped (or went backward on its very last retry), `Succeeded`
    /// if a retry pushed it all the way forward, `TimedOut` if a retry
    /// exhausted its step budget.
    pub status: TrialStatus,
    /// Weight accumulated from surviving amplifications, to be
    /// multiplied into the trial's running weight.
    pub weight_factor: f64,
    /// The interface index this attempt is charged against in the
    /// result store — meaningful when `status` is `Pruned` or
    /// `TimedOut`, ignored otherwise. Clamped to never go below 1.
    pub pruned_at: usize,
    /// Set when `status` is `Pruned` *because* the last retreat attempt
    /// went backward again rather than because the dice roll chopped it
    /// outright (or no retreat was eligible at all). Distinguishes the
    /// result store's `back` bucket from `nprune`.
    pub back: bool,
}

/// Attempts to save a trial that failed to cross onward from
/// `interface` by retreating to earlier interfaces with increasing
/// weight.
///
/// `nsteplambda` / `nstepmax` bound each retry's `advance_to_lambda`
/// call exactly as a normal forward trial segment would be bounded.
pub fn prune(
    facade: &mut dyn SimulatorFacade,
    interfaces: &InterfaceTable,
    interface: usize,
    rng: &mut Lcg,
    nsteplambda: usize,
    nstepmax: usize,
) -> Result<PruneOutcome, FfsError> {
    let lambda_max = interfaces.lambda(interface + 1);
    let mut status = TrialStatus::Pruned;
    let mut weight_factor = 1.0;
    let mut n = interface as i64;

    while n > 2 {
        let random = rng.next_f64();
        let prob_prune = interfaces.get(n as usize - 1).pprune;

        status = TrialStatus::Pruned;
        if random < prob_prune {
            break;
        }

        weight_factor *= 1.0 / (1.0 - prob_prune);

        let lambda_min = interfaces.lambda(n as usize - 2);
        status = advance_to_lambda(facade, lambda_min, lambda_max, nsteplambda, nstepmax)?;

        if status == TrialStatus::Succeeded {
            break;
        }

        n -= 1;
    }

    let back = status == TrialStatus::WentBackward;
    if back {
        status = TrialStatus::Pruned;
    }

    // Computed regardless of final status: both `Pruned` and `TimedOut`
    // outcomes charge the result store at this interface.
    let pruned_at = (n - 1).max(1) as usize;

    Ok(PruneOutcome {
        status,
        weight_factor,
        pruned_at,
        back,
    })
}
