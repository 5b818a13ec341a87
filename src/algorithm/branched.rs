//! Branched FFS: every surviving trial spawns `ntrial` independent
//! descendants at the next interface, explored via recursion — the
//! call stack plays the role of the reference implementation's
//! `ffs_branched_recursive`. Weight simply splits evenly across
//! descendants; there is no ensemble to decimate.

use crate::error::FfsError;
use crate::facade::{SimulatorFacade, StateOp};
use crate::interface::InterfaceTable;
use crate::result::ResultStore;
use crate::rng::Lcg;
use crate::state::StateRef;

use super::{run_one_trial, StepBudget, TrialOutcome};

/// Runs the full branched recursion from a single trial that has
/// already reached interface 1, accumulating into `result`.
///
/// Each individual descendant's trajectory RNG is reseeded from
/// `base_seed + global_trial_id` (spec.md §4.4.1 step 2a / §5), a
/// monotonic counter threaded through the whole tree rather than one
/// continuous stream shared by every descendant.
pub fn run(
    facade: &mut dyn SimulatorFacade,
    interfaces: &InterfaceTable,
    instance: usize,
    proxy: usize,
    root_state: StateRef,
    base_seed: u64,
    budget: StepBudget,
) -> Result<ResultStore, FfsError> {
    let nlambda = interfaces.nlambda();
    let mut result = ResultStore::new(nlambda);
    let mut trial_rng = Lcg::new(base_seed);
    let mut next_id = root_state.trial_id() + 1;
    let mut global_trial_id: u64 = 0;

    recurse(
        facade,
        interfaces,
        instance,
        proxy,
        1,
        root_state,
        1.0,
        base_seed,
        &mut trial_rng,
        &mut next_id,
        &mut global_trial_id,
        budget,
        &mut result,
    )?;

    Ok(result)
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    facade: &mut dyn SimulatorFacade,
    interfaces: &InterfaceTable,
    instance: usize,
    proxy: usize,
    interface: usize,
    state_ref: StateRef,
    weight: f64,
    base_seed: u64,
    trial_rng: &mut Lcg,
    next_id: &mut u64,
    global_trial_id: &mut u64,
    budget: StepBudget,
    result: &mut ResultStore,
) -> Result<(), FfsError> {
    result.accumulate_weight(interface, weight);

    let nlambda = interfaces.nlambda();
    if interface == nlambda {
        return Ok(());
    }

    let ntrial = interfaces.get(interface).ntrial;
    result.add_trial(interface, ntrial as u64);
    let wt_per_trial = weight / ntrial as f64;

    for _ in 0..ntrial {
        let child_id = *next_id;
        *next_id += 1;
        let child_state = StateRef::new(instance, proxy, child_id);

        *global_trial_id += 1;
        trial_rng.reseed(base_seed.wrapping_add(*global_trial_id));

        let outcome: TrialOutcome =
            run_one_trial(facade, interfaces, interface, state_ref, trial_rng, budget)?;

        if outcome.status == crate::trial::TrialStatus::Succeeded {
            result.add_success(interface + 1);
            facade.state(StateOp::Write, child_state)?;
            recurse(
                facade,
                interfaces,
                instance,
                proxy,
                interface + 1,
                child_state,
                wt_per_trial * outcome.weight,
                base_seed,
                trial_rng,
                next_id,
                global_trial_id,
                budget,
                result,
            )?;
            facade.state(StateOp::Delete, child_state)?;
        } else if let Some(pruned_at) = outcome.pruned_at {
            match outcome.status {
                crate::trial::TrialStatus::Pruned => {
                    if outcome.back {
                        result.add_back(pruned_at);
                    } else {
                        result.add_prune(pruned_at);
                    }
                }
                crate::trial::TrialStatus::TimedOut => result.add_timeout(pruned_at, 1),
                _ => {}
            }
        }
    }

    Ok(())
}
