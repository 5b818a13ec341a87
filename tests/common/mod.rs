//! Shared fixtures for the integration tests: a fully deterministic
//! sawtooth order parameter, with no RNG anywhere in its dynamics, so
//! tests can compute the exact expected crossing counts and elapsed
//! times by hand instead of relying on statistical tolerance bands.

use std::collections::HashMap;

use ffs_core::error::FfsError;
use ffs_core::facade::{ExecuteOp, InfoTopic, SimulatorFacade, StateOp};
use ffs_core::state::StateRef;

/// `lambda` ramps linearly from `0` to `period - 1` in steps of
/// `rate`, then drops back to `0` and repeats — a sawtooth rather than
/// the smooth oscillator the mock backends offer, chosen because its
/// interface crossings land on exact, predictable step counts.
pub struct SawtoothBackend {
    step: u64,
    time: f64,
    period: u64,
    rate: f64,
    store: HashMap<String, u64>,
}

impl SawtoothBackend {
    pub fn new(period: u64, rate: f64) -> Self {
        SawtoothBackend {
            step: 0,
            time: 0.0,
            period,
            rate,
            store: HashMap::new(),
        }
    }
}

impl SimulatorFacade for SawtoothBackend {
    fn execute(&mut self, op: ExecuteOp) -> Result<(), FfsError> {
        match op {
            ExecuteOp::Init | ExecuteOp::Finish => Ok(()),
            ExecuteOp::Run => {
                self.step = (self.step + 1) % self.period;
                self.time += 1.0;
                Ok(())
            }
        }
    }

    fn state(&mut self, op: StateOp, state_ref: StateRef) -> Result<(), FfsError> {
        let stub = state_ref.stub();
        match op {
            StateOp::Init => {
                self.step = 0;
                self.time = 0.0;
                Ok(())
            }
            StateOp::Read => {
                let step = self.store.get(&stub).ok_or_else(|| {
                    FfsError::Storage(format!("no stored state for '{stub}'"))
                })?;
                self.step = *step;
                Ok(())
            }
            StateOp::Write => {
                self.store.insert(stub, self.step);
                Ok(())
            }
            StateOp::Delete => {
                self.store.remove(&stub);
                Ok(())
            }
        }
    }

    fn lambda(&mut self) -> Result<f64, FfsError> {
        Ok(self.step as f64 * self.rate)
    }

    fn time(&mut self) -> Result<f64, FfsError> {
        Ok(self.time)
    }

    fn info(&mut self, _topic: InfoTopic, _value: i64) -> Result<(), FfsError> {
        Ok(())
    }
}
