//! Four proxies, each running an identical deterministic trajectory
//! independently, should reduce to exactly four times one proxy's
//! counts: no crossing, no elapsed time, and no trial is silently
//! dropped or double-counted by the collective merge.

mod common;

use common::SawtoothBackend;
use ffs_core::algorithm::StepBudget;
use ffs_core::facade::{SimulatorFacade, StateOp};
use ffs_core::flux::FluxParams;
use ffs_core::instance::{AlgorithmKind, InstanceConfig, InstanceController, InstanceOutcome};
use ffs_core::interface::InterfaceTable;
use ffs_core::state::StateRef;

#[test]
fn four_proxies_reduce_to_four_times_one_proxys_crossings() {
    // lambda_a far below anything the sawtooth reaches (no A-region at
    // all) and lambda_b = 25.0 splits each 50-step period into 26 steps
    // of "transition" and 24 of "B", giving exactly one B-entry per
    // period: entries at t = 26, 76, 126, 176, 226, 276 within 300 time
    // units, 6 per proxy.
    let interfaces = InterfaceTable::uniform(2, -100.0, 25.0, 4, 4, 4, 0.0).unwrap();
    let sinit = StateRef::new(0, usize::MAX, 0);

    let config = InstanceConfig {
        interfaces,
        algorithm: AlgorithmKind::BruteForce,
        nproxy: 4,
        base_seed: 99,
        flux: FluxParams {
            teq: 0.0,
            nstepmax: 1,
            prob_accept: 1.0,
            init_independent: true,
            nskip: 1,
        },
        budget: StepBudget {
            nsteplambda: 1,
            nstepmax: 1,
        },
        bruteforce_t_max: 300.0,
    };

    let mut controller = InstanceController::new(0);
    controller.start().unwrap();
    controller.configure(config).unwrap();

    controller
        .run(
            |_proxy| {
                let mut backend = SawtoothBackend::new(50, 1.0);
                backend.state(StateOp::Write, sinit)?;
                Ok(Box::new(backend) as Box<dyn ffs_core::facade::SimulatorFacade>)
            },
            sinit,
        )
        .unwrap();

    match controller.outcome().unwrap() {
        InstanceOutcome::BruteForce(result) => {
            assert_eq!(result.crossings.len(), 4 * 6);
            assert_eq!(result.total_time, 4.0 * 300.0);
            assert_eq!(result.rate_estimate(), 24.0 / 1200.0);
        }
        InstanceOutcome::Biased(_) => panic!("expected a brute-force outcome"),
    }
}
