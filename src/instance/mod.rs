//! # Instance Controller Module
//!
//! `C11`: the state machine binding an interface table, an algorithm
//! choice, and a simulator-facade factory into one complete FFS
//! calculation — initial-flux generation, the chosen interface-
//! advancement driver run once per cooperating proxy, and a final
//! collective reduction into a single [`ResultStore`]. Grounded in
//! `ffs_inst.c`/`ffs_control.c`'s linear lifecycle.


use std::sync::Mutex;

use log::{debug, error, info};

use crate::algorithm::{self, bruteforce::BruteForceResult, StepBudget};
use crate::comm::{Communicator, LocalComm};
use crate::error::FfsError;
use crate::facade::{ExecuteOp, SimulatorFacade};
use crate::flux::{self, FluxParams};
use crate::interface::InterfaceTable;
use crate::result::ResultStore;
use crate::rng::Lcg;
use crate::state::StateRef;
use crate::trial::TrialStatus;

/// Which interface-advancement driver an instance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    Direct,
    Branched,
    Rosenbluth,
    /// No interface machinery at all — a single long unbiased
    /// trajectory, used only to sanity-check the other three's rate
    /// estimate.
    BruteForce,
}

/// The instance controller's lifecycle state (spec.md §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Created,
    Started,
    Configured,
    Running,
    Reduced,
    Stopped,
}

/// Parameters fixed once an instance leaves `started` for `configured`.
#[derive(Debug, Clone)]
pub struct InstanceConfig {
    pub interfaces: InterfaceTable,
    pub algorithm: AlgorithmKind,
    pub nproxy: usize,
    pub base_seed: u64,
    pub flux: FluxParams,
    pub budget: StepBudget,
    /// Upper bound on simulated time for a brute-force run. Unused by
    /// the other three algorithms.
    pub bruteforce_t_max: f64,
}

impl InstanceConfig {
    /// The trial-count-divides-proxy-count check spec.md §4.8 mandates
    /// at configuration time.
    fn validate(&self) -> Result<(), FfsError> {
        if self.nproxy == 0 {
            return Err(FfsError::Configuration(
                "nproxy must be at least 1".into(),
            ));
        }
        for iface in self.interfaces.iter() {
            if iface.ntrial % self.nproxy != 0 {
                return Err(FfsError::Configuration(format!(
                    "interface {} ntrial={} does not divide evenly across {} proxies",
                    iface.index, iface.ntrial, self.nproxy
                )));
            }
        }
        Ok(())
    }
}

/// The result of a completed instance: either a biased algorithm's
/// reduced [`ResultStore`], or a brute-force validation report. The two
/// are never mixed within one instance.
#[derive(Debug, Clone)]
pub enum InstanceOutcome {
    Biased(ResultStore),
    BruteForce(BruteForceResult),
}

/// Orchestrates one complete FFS calculation across `nproxy` proxies,
/// each running on its own OS thread and communicating only through
/// [`LocalComm`]'s collectives.
pub struct InstanceController {
    id: usize,
    state: InstanceState,
    config: Option<InstanceConfig>,
    outcome: Option<InstanceOutcome>,
}

impl InstanceController {
    pub fn new(id: usize) -> Self {
        InstanceController {
            id,
            state: InstanceState::Created,
            config: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// `created -> started`.
    pub fn start(&mut self) -> Result<(), FfsError> {
        self.expect_state(InstanceState::Created)?;
        info!("instance {}: started", self.id);
        self.state = InstanceState::Started;
        Ok(())
    }

    /// `started -> configured`. On a rejected configuration the instance
    /// routes straight to `stopped`, per spec.md §4.8's "any failure
    /// re-routes to stopped via cleanup".
    pub fn configure(&mut self, config: InstanceConfig) -> Result<(), FfsError> {
        self.expect_state(InstanceState::Started)?;
        if let Err(e) = config.validate() {
            error!("instance {}: configuration rejected: {e}", self.id);
            self.state = InstanceState::Stopped;
            return Err(e);
        }
        info!(
            "instance {}: configured, nlambda={}, nproxy={}, algorithm={:?}",
            self.id,
            config.interfaces.nlambda(),
            config.nproxy,
            config.algorithm
        );
        self.config = Some(config);
        self.state = InstanceState::Configured;
        Ok(())
    }

    /// `configured -> running -> reduced`. `facade_factory` builds one
    /// facade per proxy (given its rank, `0..nproxy`); `sinit` names the
    /// reference A-basin state every proxy's initial-flux generation
    /// reads from. Each proxy's facade is logically a separate process
    /// with no access to another's state store, so `facade_factory` is
    /// responsible for writing `sinit` into every facade it builds
    /// before returning it (a real file-backed facade would instead
    /// find the reference state already materialized on shared
    /// storage).
    pub fn run<F>(&mut self, facade_factory: F, sinit: StateRef) -> Result<(), FfsError>
    where
        F: Fn(usize) -> Result<Box<dyn SimulatorFacade>, FfsError> + Sync,
    {
        self.expect_state(InstanceState::Configured)?;
        let config = self
            .config
            .clone()
            .expect("configured state implies config is set");
        info!("instance {}: running, nproxy={}", self.id, config.nproxy);
        self.state = InstanceState::Running;

        let comms = LocalComm::group(config.nproxy);
        let outcomes: Mutex<Vec<Option<InstanceOutcome>>> =
            Mutex::new((0..config.nproxy).map(|_| None).collect());
        let errors: Mutex<Vec<Option<FfsError>>> =
            Mutex::new((0..config.nproxy).map(|_| None).collect());

        let instance_id = self.id;
        std::thread::scope(|scope| {
            for (proxy, comm) in comms.into_iter().enumerate() {
                let config = &config;
                let facade_factory = &facade_factory;
                let outcomes = &outcomes;
                let errors = &errors;
                scope.spawn(move || {
                    match run_proxy(instance_id, proxy, config, facade_factory, sinit, &comm) {
                        Ok(outcome) => outcomes.lock().unwrap()[proxy] = Some(outcome),
                        Err(e) => errors.lock().unwrap()[proxy] = Some(e),
                    }
                });
            }
        });

        if let Some(e) = errors.into_inner().unwrap().into_iter().flatten().next() {
            error!("instance {}: proxy failed: {e}", self.id);
            self.state = InstanceState::Stopped;
            return Err(e);
        }

        let collected: Vec<InstanceOutcome> =
            outcomes.into_inner().unwrap().into_iter().flatten().collect();
        let merged = merge_outcomes(&config, collected)?;

        self.outcome = Some(merged);
        self.state = InstanceState::Reduced;
        info!("instance {}: reduced", self.id);
        Ok(())
    }

    /// `reduced -> stopped` (also reachable directly from any earlier
    /// state on failure, via the individual transition methods above).
    pub fn stop(&mut self) {
        info!("instance {}: stopped", self.id);
        self.state = InstanceState::Stopped;
    }

    /// The final outcome, once reduction has completed.
    pub fn outcome(&self) -> Option<&InstanceOutcome> {
        self.outcome.as_ref()
    }

    fn expect_state(&self, expected: InstanceState) -> Result<(), FfsError> {
        if self.state != expected {
            return Err(FfsError::Configuration(format!(
                "instance {}: expected state {:?}, found {:?}",
                self.id, expected, self.state
            )));
        }
        Ok(())
    }
}

fn merge_outcomes(
    config: &InstanceConfig,
    outcomes: Vec<InstanceOutcome>,
) -> Result<InstanceOutcome, FfsError> {
    match config.algorithm {
        AlgorithmKind::BruteForce => {
            let mut crossings = Vec::new();
            let mut total_time = 0.0;
            for outcome in outcomes {
                if let InstanceOutcome::BruteForce(bf) = outcome {
                    crossings.extend(bf.crossings);
                    total_time += bf.total_time;
                }
            }
            Ok(InstanceOutcome::BruteForce(BruteForceResult {
                crossings,
                total_time,
            }))
        }
        _ => {
            let mut merged = ResultStore::new(config.interfaces.nlambda());
            for outcome in outcomes {
                if let InstanceOutcome::Biased(store) = outcome {
                    merged.merge(&store);
                }
            }
            Ok(InstanceOutcome::Biased(merged))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_proxy<F>(
    instance: usize,
    proxy: usize,
    config: &InstanceConfig,
    facade_factory: &F,
    sinit: StateRef,
    comm: &LocalComm,
) -> Result<InstanceOutcome, FfsError>
where
    F: Fn(usize) -> Result<Box<dyn SimulatorFacade>, FfsError>,
{
    let setup = facade_factory(proxy).and_then(|mut facade| {
        facade.execute(ExecuteOp::Init)?;
        Ok(facade)
    });
    comm.checked(setup.is_ok())
        .map_err(|_| FfsError::FacadeInit(format!("proxy {proxy}: a peer proxy failed to initialize")))?;
    let mut facade = setup?;

    if config.algorithm == AlgorithmKind::BruteForce {
        let result = algorithm::bruteforce::run(
            facade.as_mut(),
            config.interfaces.lambda_a(),
            config.interfaces.lambda_b(),
            config.budget.nsteplambda,
            config.bruteforce_t_max,
        )?;
        comm.checked(true).ok();
        return Ok(InstanceOutcome::BruteForce(result));
    }

    let proxy_seed = config.base_seed.wrapping_add(proxy as u64 + 1);
    let mut trial_rng = Lcg::new(proxy_seed);
    let mut traj_rng = Lcg::new(proxy_seed.wrapping_mul(2).wrapping_add(1));

    let trials_per_proxy = config.interfaces.get(1).ntrial / config.nproxy;
    let mut crossings = Vec::new();
    let mut next_id = 1u64;
    let mut flux_crossings = 0u64;
    let mut flux_time = 0.0;

    for trial_index in 1..=trials_per_proxy as u64 {
        let outcome = flux::run_initial_flux(
            facade.as_mut(),
            config.flux,
            config.interfaces.lambda_a(),
            config.interfaces.lambda_b(),
            sinit,
            &mut trial_rng,
            &mut traj_rng,
            trial_index,
        )?;
        flux_crossings += outcome.ncross;
        flux_time += outcome.elapsed_time;

        if outcome.status == TrialStatus::Succeeded {
            let trial_id = next_id;
            next_id += 1;
            let state_ref = StateRef::new(instance, proxy, trial_id);
            facade.state(crate::facade::StateOp::Write, state_ref)?;
            crossings.push((trial_id, state_ref));
        }
    }
    debug!(
        "instance {instance} proxy {proxy}: initial flux generated {} crossing(s)",
        crossings.len()
    );

    comm.checked(true)
        .map_err(|_| FfsError::Reduction(format!("proxy {proxy}: a peer proxy failed during initial-flux generation")))?;

    let mut result = ResultStore::new(config.interfaces.nlambda());

    match config.algorithm {
        AlgorithmKind::Direct => {
            // `direct::run` sets interface 1's `nkeep` itself from the
            // initial crossing ensemble it is handed.
            let wave_result = algorithm::direct::run(
                facade.as_mut(),
                &config.interfaces,
                instance,
                proxy,
                &crossings,
                proxy_seed,
                config.budget,
            )?;
            result.merge(&wave_result);
        }
        AlgorithmKind::Branched => {
            for (_, root) in &crossings {
                let tree_result = algorithm::branched::run(
                    facade.as_mut(),
                    &config.interfaces,
                    instance,
                    proxy,
                    *root,
                    proxy_seed,
                    config.budget,
                )?;
                result.merge(&tree_result);
            }
            result.set_nkeep(1, crossings.len() as u64);
        }
        AlgorithmKind::Rosenbluth => {
            for (_, root) in &crossings {
                let line_result = algorithm::rosenbluth::run(
                    facade.as_mut(),
                    &config.interfaces,
                    instance,
                    proxy,
                    *root,
                    proxy_seed,
                    config.budget,
                )?;
                result.merge(&line_result);
            }
            result.set_nkeep(1, crossings.len() as u64);
        }
        AlgorithmKind::BruteForce => unreachable!("handled above"),
    }

    result.accumulate_flux_time(flux_time);
    for _ in 0..flux_crossings {
        result.add_flux_crossing();
    }

    facade.execute(ExecuteOp::Finish).ok();
    comm.checked(true)
        .map_err(|_| FfsError::Reduction(format!("proxy {proxy}: a peer proxy failed during the algorithm driver")))?;

    Ok(InstanceOutcome::Biased(result))
}
