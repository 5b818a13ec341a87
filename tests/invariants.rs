//! Properties that must hold regardless of which scenario drives them:
//! reproducibility given an identical configuration and seed, additive
//! reduction across proxies, and the flux estimator's
//! sum-of-crossings-over-sum-of-times definition (never a mean of
//! per-trial flux estimates, which would weight short and long runs
//! equally instead of by how much evidence they contain).

mod common;

use common::SawtoothBackend;
use ffs_core::algorithm::StepBudget;
use ffs_core::ensemble::Ensemble;
use ffs_core::facade::mock::RandomWalkBackend;
use ffs_core::facade::{SimulatorFacade, StateOp};
use ffs_core::flux::{estimate_flux, FluxParams};
use ffs_core::instance::{AlgorithmKind, InstanceConfig, InstanceController, InstanceOutcome};
use ffs_core::interface::InterfaceTable;
use ffs_core::result::ResultStore;
use ffs_core::rng::Lcg;
use ffs_core::state::StateRef;

fn run_once(seed: u64) -> ResultStore {
    let interfaces = InterfaceTable::uniform(4, 0.0, 3.0, 40, 40, 40, 0.3).unwrap();
    let sinit = StateRef::new(0, 0, 0);

    let config = InstanceConfig {
        interfaces,
        algorithm: AlgorithmKind::Direct,
        nproxy: 2,
        base_seed: seed,
        flux: FluxParams {
            teq: 0.0,
            nstepmax: 2_000,
            prob_accept: 1.0,
            init_independent: true,
            nskip: 1,
        },
        budget: StepBudget {
            nsteplambda: 1,
            nstepmax: 2_000,
        },
        bruteforce_t_max: 0.0,
    };

    let mut controller = InstanceController::new(0);
    controller.start().unwrap();
    controller.configure(config).unwrap();
    controller
        .run(
            |_proxy| {
                let mut backend = RandomWalkBackend::with_params(1.0, 0.5);
                backend.state(StateOp::Write, sinit)?;
                Ok(Box::new(backend) as Box<dyn ffs_core::facade::SimulatorFacade>)
            },
            sinit,
        )
        .unwrap();

    match controller.outcome().unwrap() {
        InstanceOutcome::Biased(store) => store.clone(),
        InstanceOutcome::BruteForce(_) => panic!("expected a biased outcome"),
    }
}

#[test]
fn identical_config_and_seed_reproduce_bitwise_identical_results() {
    let a = run_once(42);
    let b = run_once(42);

    let a_json = serde_json::to_string(&a).unwrap();
    let b_json = serde_json::to_string(&b).unwrap();
    assert_eq!(a_json, b_json, "two runs with the same (config, seed, proxy count) must match exactly");
}

#[test]
fn a_different_seed_is_not_required_to_reproduce_the_same_result() {
    // Not an invariant in itself, but guards against the reproducibility
    // test above passing for the wrong reason (e.g. the seed silently
    // not being threaded through to the dynamics at all).
    let a = run_once(42);
    let b = run_once(43);
    let a_json = serde_json::to_string(&a).unwrap();
    let b_json = serde_json::to_string(&b).unwrap();
    assert_ne!(a_json, b_json);
}

#[test]
fn flux_estimate_is_total_crossings_over_total_time_not_a_mean_of_per_trial_rates() {
    // Two trials, one long and one short: a mean of per-trial flux
    // estimates would weight them equally; the sum-of-sums definition
    // weights by how much time each trial actually ran.
    let short_trial = (1u64, 1.0); // flux = 1.0
    let long_trial = (1u64, 100.0); // flux = 0.01

    let total_crossings = short_trial.0 + long_trial.0;
    let total_time = short_trial.1 + long_trial.1;
    let combined = estimate_flux(total_crossings, total_time);

    let mean_of_rates = (1.0 / short_trial.1 + 1.0 / long_trial.1) / 2.0;
    assert!(
        (combined - mean_of_rates).abs() > 1e-6,
        "sum-of-sums estimate ({combined}) should differ from the naive mean ({mean_of_rates})"
    );
    assert_eq!(combined, 2.0 / 101.0);
}

#[test]
fn estimate_flux_guards_against_zero_elapsed_time() {
    assert_eq!(estimate_flux(0, 0.0), 0.0);
    assert_eq!(estimate_flux(5, 0.0), 0.0);
}

#[test]
fn result_store_merge_is_purely_additive_per_interface() {
    let mut a = ResultStore::new(3);
    a.add_trial(1, 10);
    a.add_success(2);
    a.accumulate_weight(2, 4.0);
    a.accumulate_flux_time(12.0);
    a.add_flux_crossing();

    let mut b = ResultStore::new(3);
    b.add_trial(1, 5);
    b.add_success(2);
    b.accumulate_weight(2, 1.5);
    b.accumulate_flux_time(8.0);
    b.add_flux_crossing();

    a.merge(&b);

    let counters = a.get(1);
    assert_eq!(counters.ntrial, 15);
    let counters2 = a.get(2);
    assert_eq!(counters2.nsuccess, 2);
    assert_eq!(counters2.weight, 5.5);

    let flux = a.flux_totals();
    assert_eq!(flux.ncross, 2);
    assert_eq!(flux.time, 20.0);
}

#[test]
fn every_launched_trial_lands_in_exactly_one_outcome_bucket() {
    // Each forward trial ends in exactly one of four buckets: it
    // succeeds (charged at the interface it arrives at), or it is
    // pruned, backward-exhausted, or times out (all three charged at
    // the pruning anchor interface, which can differ from the
    // interface that actually launched the trial). Summed globally
    // across every interface, the four buckets must exactly exhaust
    // the total number of trials launched.
    let store = run_once(99);

    let mut total_trial = 0u64;
    let mut total_success = 0u64;
    let mut total_back = 0u64;
    let mut total_prune = 0u64;
    let mut total_timeout = 0u64;
    for n in 1..=store.nlambda() {
        let c = store.get(n);
        total_trial += c.ntrial;
        total_success += c.nsuccess;
        total_back += c.back;
        total_prune += c.nprune;
        total_timeout += c.nto;
    }

    assert_eq!(total_trial, total_success + total_back + total_prune + total_timeout);
}

#[test]
fn weight_biased_sampling_converges_to_relative_weights() {
    let mut ensemble = Ensemble::new();
    ensemble.push(1, 1.0);
    ensemble.push(2, 3.0);

    let mut rng = Lcg::new(123);
    let mut picked_heavy = 0u32;
    let trials = 20_000;
    for _ in 0..trials {
        let idx = ensemble.sample_weight_biased(&mut rng).unwrap();
        if ensemble.get(idx).trial_id == 2 {
            picked_heavy += 1;
        }
    }

    let observed = picked_heavy as f64 / trials as f64;
    // True proportion is 3/4 = 0.75; a generous tolerance absorbs
    // whatever correlation the LCG's short period introduces.
    assert!(
        (observed - 0.75).abs() < 0.05,
        "expected roughly 75% of draws to favor the heavier member, got {observed}"
    );
}

#[test]
fn a_sawtooth_fixture_is_self_consistent_across_read_write() {
    let mut backend = SawtoothBackend::new(10, 2.0);
    let a = StateRef::new(0, 0, 1);
    let b = StateRef::new(0, 0, 2);

    backend.execute(ffs_core::facade::ExecuteOp::Run).unwrap();
    backend.execute(ffs_core::facade::ExecuteOp::Run).unwrap();
    backend.execute(ffs_core::facade::ExecuteOp::Run).unwrap();
    assert_eq!(backend.lambda().unwrap(), 6.0);
    backend.state(StateOp::Write, a).unwrap();

    backend.state(StateOp::Init, b).unwrap();
    assert_eq!(backend.lambda().unwrap(), 0.0);

    backend.state(StateOp::Read, a).unwrap();
    assert_eq!(backend.lambda().unwrap(), 6.0);
}
