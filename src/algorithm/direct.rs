//! Direct (wave-based) FFS: at each interface, a fixed number of
//! trials is fired from the surviving ensemble, and the result is
//! decimated back down to the interface's target ensemble size before
//! the next wave begins. Grounded in `ffs_direct.c`.

use crate::ensemble::Ensemble;
use crate::error::FfsError;
use crate::facade::{ExecuteOp, SimulatorFacade, StateOp};
use crate::interface::InterfaceTable;
use crate::result::ResultStore;
use crate::rng::Lcg;
use crate::state::StateRef;

use super::{run_one_trial, StepBudget, TrialOutcome};

/// Generates the initial ensemble at interface 1 by running
/// `ntrial` initial-flux trials and keeping the ones that cross, then
/// advances wave by wave to the final interface.
///
/// `base_seed` and `instance`/`proxy` identify this proxy's state file
/// namespace; `flux` supplies the already-accumulated per-trial
/// crossing data needed to seed each initial trial's RNG stream
/// (callers run [`crate::flux::run_initial_flux`] separately to
/// populate `initial_states`).
///
/// The trajectory RNG is reseeded once per trial from `base_seed +
/// global_trial_id` (spec.md §4.4.1 step 2a, mirroring
/// `ffs_direct_trials`'s `lseed = inst_seed + itraj - 1`), independent
/// of how many interfaces or proxies the run has; a separate,
/// continuously-advancing stream drives only the ensemble's
/// weight-biased parent sampling, which the spec leaves unspecified.
pub fn run(
    facade: &mut dyn SimulatorFacade,
    interfaces: &InterfaceTable,
    instance: usize,
    proxy: usize,
    initial_states: &[(u64, StateRef)],
    base_seed: u64,
    budget: StepBudget,
) -> Result<ResultStore, FfsError> {
    let nlambda = interfaces.nlambda();
    let mut result = ResultStore::new(nlambda);

    let mut ensemble = Ensemble::new();
    for &(trial_id, state_ref) in initial_states {
        ensemble.push(trial_id, 1.0);
        let _ = state_ref;
    }
    result.set_nkeep(1, ensemble.nsuccess() as u64);

    let mut next_trial_id = initial_states
        .iter()
        .map(|(id, _)| *id)
        .max()
        .unwrap_or(0)
        + 1;

    let mut sample_rng = Lcg::new(base_seed);
    let mut trial_rng = Lcg::new(base_seed);
    let mut global_trial_id: u64 = 0;

    for interface in 1..nlambda {
        if ensemble.nsuccess() == 0 {
            break;
        }

        let target = interfaces.get(interface).ntrial;
        result.add_trial(interface, target as u64);

        let mut new_ensemble = Ensemble::new();

        for _ in 0..target {
            let pick = ensemble
                .sample_weight_biased(&mut sample_rng)
                .expect("non-empty ensemble has a weight-biased sample");
            let member = ensemble.get(pick);
            let source = StateRef::new(instance, proxy, member.trial_id);

            global_trial_id += 1;
            trial_rng.reseed(base_seed.wrapping_add(global_trial_id));

            let outcome =
                run_one_trial(facade, interfaces, interface, source, &mut trial_rng, budget)?;

            record_outcome(&mut result, interface, &outcome);

            if outcome.status == crate::trial::TrialStatus::Succeeded {
                let trial_id = next_trial_id;
                next_trial_id += 1;
                let dest = StateRef::new(instance, proxy, trial_id);
                facade.state(StateOp::Write, dest)?;
                new_ensemble.push(trial_id, outcome.weight);
                result.add_success(interface + 1);
                result.accumulate_weight(interface + 1, outcome.weight);
            }
        }

        decimate(
            facade,
            instance,
            proxy,
            &mut new_ensemble,
            interfaces.get(interface + 1).nstate_target,
        );
        result.set_nkeep(interface + 1, new_ensemble.nsuccess() as u64);

        // This wave's parents are superseded: no further trial may
        // branch from them once the decimated child ensemble takes
        // over (C3's "DELETE when no trial may branch from it").
        delete_ensemble_states(facade, instance, proxy, &ensemble);

        ensemble = new_ensemble;
    }

    facade.execute(ExecuteOp::Finish).ok();
    Ok(result)
}

fn record_outcome(result: &mut ResultStore, interface: usize, outcome: &TrialOutcome) {
    match outcome.pruned_at {
        Some(pruned_at) => match outcome.status {
            crate::trial::TrialStatus::Pruned => {
                if outcome.back {
                    result.add_back(pruned_at);
                } else {
                    result.add_prune(pruned_at);
                }
            }
            crate::trial::TrialStatus::TimedOut => result.add_timeout(pruned_at, 1),
            _ => {}
        },
        None => {
            if outcome.status == crate::trial::TrialStatus::TimedOut {
                result.add_timeout(interface, 1);
            }
        }
    }
}

/// Keeps at most `target` members, the same excess-deletion idea as
/// `ffs_direct_close_up`/`ffs_direct_delete`: evenly spaced indices are
/// dropped rather than a plain prefix truncation, so decimation doesn't
/// systematically favor early-sampled trajectories. Dropped states are
/// deleted through the facade, not just unlinked from the in-memory
/// ensemble, so no harvested state ever leaks on the storage side.
fn decimate(
    facade: &mut dyn SimulatorFacade,
    instance: usize,
    proxy: usize,
    ensemble: &mut Ensemble,
    target: usize,
) {
    let n = ensemble.nsuccess();
    if target == 0 || n <= target {
        return;
    }
    let excess = n - target;
    let mut drop = vec![false; n];
    for k in 0..excess {
        let idx = k * (n / excess);
        drop[idx.min(n - 1)] = true;
    }
    let mut kept = Ensemble::new();
    for (i, m) in ensemble.iter().enumerate() {
        if drop[i] {
            facade
                .state(StateOp::Delete, StateRef::new(instance, proxy, m.trial_id))
                .ok();
        } else {
            kept.push(m.trial_id, m.weight);
        }
    }
    *ensemble = kept;
}

/// Deletes every member's persisted state through the facade, used once
/// a wave's surviving ensemble has been fully replaced by the next.
fn delete_ensemble_states(
    facade: &mut dyn SimulatorFacade,
    instance: usize,
    proxy: usize,
    ensemble: &Ensemble,
) {
    for m in ensemble.iter() {
        facade
            .state(StateOp::Delete, StateRef::new(instance, proxy, m.trial_id))
            .ok();
    }
}
