//! Rosenbluth FFS: at each interface, `ntrial` independent attempts are
//! made from the current state, every successful one is recorded, but
//! only a single randomly chosen survivor is carried forward by
//! recursion — the rest are discarded. The carried weight is the
//! classic Rosenbluth weight, `w_in * nsuccess / ntrial`. Grounded in
//! `ffs_rosenbluth.c`.
//!
//! The result store keeps the reference's two separate accumulators
//! (`ffs_rosenbluth_results`'s `wt`/`swt` columns): `wt[n]` is the
//! incoming weight `w_in` launched from interface `n`, accumulated
//! before that interface's trials run; `swt[n]` is the resulting
//! success-weighted tally `w_in * nsuccess / ntrial`, accumulated after,
//! at the same index. `P(B|A)` is the product of `swt_n / wt_n`.

use crate::error::FfsError;
use crate::facade::{SimulatorFacade, StateOp};
use crate::interface::InterfaceTable;
use crate::result::ResultStore;
use crate::rng::Lcg;
use crate::state::StateRef;

use super::{run_one_trial, StepBudget};

/// Each individual descendant's trajectory RNG is reseeded from
/// `base_seed + global_trial_id` (spec.md §4.4.1 step 2a / §5); a
/// separate, continuously-advancing stream picks which survivor is
/// carried forward, a choice the spec leaves unspecified.
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
    let mut select_rng = Lcg::new(base_seed.wrapping_add(1));
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
        &mut select_rng,
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
    select_rng: &mut Lcg,
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
    let mut survivors = Vec::new();

    for itrial in 0..ntrial {
        *global_trial_id += 1;
        trial_rng.reseed(base_seed.wrapping_add(*global_trial_id));

        let outcome = run_one_trial(facade, interfaces, interface, state_ref, trial_rng, budget)?;

        if outcome.status == crate::trial::TrialStatus::Succeeded {
            let child_id = *next_id;
            *next_id += 1;
            let child_state = StateRef::new(instance, proxy, child_id);
            facade.state(StateOp::Write, child_state)?;
            result.add_success(interface + 1);
            survivors.push(child_state);
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

        if itrial < ntrial - 1 {
            facade.state(StateOp::Read, state_ref)?;
        }
    }

    let nsuccess = survivors.len();
    let w_out = weight * nsuccess as f64 / ntrial as f64;
    if nsuccess > 0 {
        result.accumulate_success_weight(interface, w_out);
    }

    if nsuccess > 0 {
        let mut chosen_index = (select_rng.next_f64() * nsuccess as f64) as usize;
        if chosen_index >= nsuccess {
            chosen_index = nsuccess - 1;
        }
        for (i, &child) in survivors.iter().enumerate() {
            if i != chosen_index {
                facade.state(StateOp::Delete, child).ok();
            }
        }
        let chosen = survivors[chosen_index];
        facade.state(StateOp::Read, chosen)?;
        recurse(
            facade,
            interfaces,
            instance,
            proxy,
            interface + 1,
            chosen,
            w_out,
            base_seed,
            trial_rng,
            select_rng,
            next_id,
            global_trial_id,
            budget,
            result,
        )?;
        facade.state(StateOp::Delete, chosen).ok();
    }

    Ok(())
}
