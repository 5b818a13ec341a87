//! # Simulator Facade Module
//!
//! `C2`: the black-box boundary between the FFS core and whatever
//! external simulation code advances the physical system. The core
//! never inspects simulator internals — it only ever calls the six
//! operations below, mirroring the reference implementation's
//! callback table (`ffs_cb_t`: `do_start`, `do_end`, `do_state_init`,
//! `do_state_set`, `do_state_record`, `do_state_remove`) plus the two
//! read-side queries (`lambda`, `info`) that the callback table leaves
//! to a separate accessor.
//!
//! What backend actually performs the dynamics is out of scope here;
//! [`mock`] supplies the concrete backends this crate tests itself
//! against.

pub mod mock;

use crate::error::FfsError;
use crate::state::StateRef;

/// What the facade is being asked to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOp {
    /// One-time backend setup, called once per proxy before any trial.
    Init,
    /// Advance the currently loaded state by one unit of internal
    /// simulator time (e.g. one step, one block of steps).
    Run,
    /// One-time backend teardown, called once per proxy after the last
    /// trial.
    Finish,
}

/// What the facade is being asked to do with a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOp {
    /// Prepare a state slot for use without mandating particular
    /// contents (used for A-region equilibration starts).
    Init,
    /// Load the referenced state into the simulator as the active
    /// configuration.
    Read,
    /// Persist the simulator's current active configuration to the
    /// referenced state.
    Write,
    /// Remove the referenced state from storage.
    Delete,
}

/// A topic that can be queried via [`SimulatorFacade::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoTopic {
    /// Inject a 32-bit seed into the backend's own RNG stream, drawn
    /// from the core's [`crate::rng::Lcg`] (see that module's doc
    /// comment for why the two RNGs are kept separate).
    RngSeedPut,
    /// A human-readable identifier for the backend, used only in log
    /// messages.
    BackendName,
}

/// The simulator-facing capability surface the FFS core is built on.
///
/// Every method takes `&mut self` because stepping or reconfiguring the
/// simulator is inherently stateful; none of them are safe to call
/// concurrently on the same facade instance, which is why each proxy
/// owns exactly one.
pub trait SimulatorFacade: Send {
    /// Runs an [`ExecuteOp`]. `Run` is the hot path, called repeatedly
    /// while a trial advances toward its next target lambda or time
    /// limit.
    fn execute(&mut self, op: ExecuteOp) -> Result<(), FfsError>;

    /// Performs a [`StateOp`] against the referenced state.
    fn state(&mut self, op: StateOp, state_ref: StateRef) -> Result<(), FfsError>;

    /// Returns the current value of the order parameter for whatever
    /// state is presently loaded (i.e. the state most recently passed
    /// to `state(StateOp::Read, ..)`, or mutated in place by `Run`).
    fn lambda(&mut self) -> Result<f64, FfsError>;

    /// Returns the backend's current internal time, used by the
    /// advance-to-time trial primitive's timeout check.
    fn time(&mut self) -> Result<f64, FfsError>;

    /// A narrow escape hatch for backend-specific configuration that
    /// does not fit the execute/state/lambda surface, keyed by
    /// [`InfoTopic`]. `value` is topic-specific; `RngSeedPut` packs the
    /// seed as an `i32` reinterpreted via `f64::from_bits`-free plain
    /// cast, consistent with how [`crate::rng::Lcg::next_seed32`]
    /// produces it.
    fn info(&mut self, topic: InfoTopic, value: i64) -> Result<(), FfsError>;
}

/// Builds a boxed [`SimulatorFacade`] from a backend name, mirroring the
/// reference implementation's string-keyed `ffs_sim_*_create` dispatch.
pub fn build(name: &str) -> Result<Box<dyn SimulatorFacade>, FfsError> {
    match name {
        "mock-random-walk" => Ok(Box::new(mock::RandomWalkBackend::new())),
        "mock-oscillator" => Ok(Box::new(mock::OscillatorBackend::new())),
        other => Err(FfsError::Configuration(format!(
            "unknown simulator backend '{other}'"
        ))),
    }
}
