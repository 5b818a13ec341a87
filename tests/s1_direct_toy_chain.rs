//! A symmetric three-hop chain (interfaces at 0, 1, 2, 3), unbiased
//! ±1 walker stepping exactly one interface spacing per move. Each
//! attempted hop is a coin flip between reaching the next interface
//! and falling back into pruning, so the direct driver's overall
//! crossing probability should land in the same ballpark as a fair
//! three-coin-flip chain rather than saturating at 0 or 1.

use ffs_core::facade::mock::RandomWalkBackend;
use ffs_core::facade::{SimulatorFacade, StateOp};
use ffs_core::flux::FluxParams;
use ffs_core::instance::{AlgorithmKind, InstanceConfig, InstanceController, InstanceOutcome};
use ffs_core::interface::InterfaceTable;
use ffs_core::result::Estimator;
use ffs_core::state::StateRef;
use ffs_core::algorithm::StepBudget;

#[test]
fn direct_run_on_symmetric_walk_lands_near_the_three_hop_chain_probability() {
    let interfaces = InterfaceTable::uniform(4, 0.0, 3.0, 200, 200, 200, 0.3).unwrap();
    let sinit = StateRef::new(0, 0, 0);

    let config = InstanceConfig {
        interfaces,
        algorithm: AlgorithmKind::Direct,
        nproxy: 1,
        base_seed: 1,
        flux: FluxParams {
            teq: 0.0,
            nstepmax: 5_000,
            prob_accept: 1.0,
            init_independent: true,
            nskip: 1,
        },
        budget: StepBudget {
            nsteplambda: 1,
            nstepmax: 5_000,
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

    let store = match controller.outcome().unwrap() {
        InstanceOutcome::Biased(store) => store.clone(),
        InstanceOutcome::BruteForce(_) => panic!("expected a biased outcome"),
    };

    assert_eq!(store.nlambda(), 4);
    let p = store.crossing_probability(Estimator::Direct);
    assert!(p.is_finite());
    assert!(
        (0.0..=1.0).contains(&p),
        "P(B|A) must be a probability, got {p}"
    );
    // A near-zero result would mean every wave died at interface 2 (no
    // amplification below it); a near-one result would mean the chain
    // drift is not actually symmetric. Neither is expected here.
    assert!(p > 0.0, "expected at least some successful crossings, got {p}");

    let rate = store.rate(Estimator::Direct);
    assert!(rate >= 0.0 && rate.is_finite());
}
