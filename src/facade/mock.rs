//! Concrete test backends for [`super::SimulatorFacade`].
//!
//! Neither backend talks to the filesystem the way a production backend
//! would (stub-named files on shared storage); both keep an in-process
//! `HashMap` keyed by [`StateRef::stub`], round-tripped through
//! `bincode` exactly as a file-backed implementation would serialize
//! its records. That is enough to exercise every facade operation and
//! every trial/pruning/flux code path without standing up an external
//! simulator.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::FfsError;
use crate::state::StateRef;

use super::{ExecuteOp, InfoTopic, SimulatorFacade, StateOp};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RandomWalkRecord {
    position: f64,
    rng_seed: u64,
}

/// A symmetric (or drift-biased) one-dimensional random walk.
///
/// `lambda` is the walker's position. Each `Run` takes one step of
/// `+step` or `-step`, with `drift` biasing the probability of a
/// forward step. Grounds the scenarios that only need a scalar order
/// parameter moving under noise (basin-crossing, pruning exhaustion,
/// weight-biased resampling).
pub struct RandomWalkBackend {
    position: f64,
    time: f64,
    step: f64,
    drift: f64,
    rng: StdRng,
    store: HashMap<String, RandomWalkRecord>,
}

impl RandomWalkBackend {
    pub fn new() -> Self {
        RandomWalkBackend {
            position: 0.0,
            time: 0.0,
            step: 0.1,
            drift: 0.5,
            rng: StdRng::seed_from_u64(1),
            store: HashMap::new(),
        }
    }

    /// Builds a walker with an explicit step size and forward-step bias,
    /// for tests that need a particular crossing rate.
    pub fn with_params(step: f64, drift: f64) -> Self {
        let mut backend = Self::new();
        backend.step = step;
        backend.drift = drift;
        backend
    }
}

impl Default for RandomWalkBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorFacade for RandomWalkBackend {
    fn execute(&mut self, op: ExecuteOp) -> Result<(), FfsError> {
        match op {
            ExecuteOp::Init | ExecuteOp::Finish => Ok(()),
            ExecuteOp::Run => {
                let forward = self.rng.random::<f64>() < self.drift;
                self.position += if forward { self.step } else { -self.step };
                self.time += 1.0;
                Ok(())
            }
        }
    }

    fn state(&mut self, op: StateOp, state_ref: StateRef) -> Result<(), FfsError> {
        let stub = state_ref.stub();
        match op {
            StateOp::Init => {
                self.position = 0.0;
                self.time = 0.0;
                Ok(())
            }
            StateOp::Read => {
                let record = self.store.get(&stub).ok_or_else(|| {
                    FfsError::Storage(format!("no stored state for '{stub}'"))
                })?;
                self.position = record.position;
                self.rng = StdRng::seed_from_u64(record.rng_seed);
                Ok(())
            }
            StateOp::Write => {
                let bytes = bincode::serialize(&RandomWalkRecord {
                    position: self.position,
                    rng_seed: self.time.to_bits(),
                })
                .map_err(|e| FfsError::Storage(e.to_string()))?;
                let record: RandomWalkRecord =
                    bincode::deserialize(&bytes).map_err(|e| FfsError::Storage(e.to_string()))?;
                self.store.insert(stub, record);
                Ok(())
            }
            StateOp::Delete => {
                self.store.remove(&stub);
                Ok(())
            }
        }
    }

    fn lambda(&mut self) -> Result<f64, FfsError> {
        Ok(self.position)
    }

    fn time(&mut self) -> Result<f64, FfsError> {
        Ok(self.time)
    }

    fn info(&mut self, topic: InfoTopic, value: i64) -> Result<(), FfsError> {
        match topic {
            InfoTopic::RngSeedPut => {
                self.rng = StdRng::seed_from_u64(value as u64);
                Ok(())
            }
            InfoTopic::BackendName => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OscillatorRecord {
    phase: f64,
}

/// A deterministic driven oscillator: `lambda = amplitude * sin(phase)`,
/// `phase` advancing by a fixed `omega` per `Run` with no randomness at
/// all. Grounds scenarios that need bit-for-bit reproducible crossing
/// times independent of any RNG (timeout-vs-lambda tie-break edge
/// cases, advance-to-lambda exactness).
pub struct OscillatorBackend {
    phase: f64,
    time: f64,
    omega: f64,
    amplitude: f64,
    store: HashMap<String, OscillatorRecord>,
}

impl OscillatorBackend {
    pub fn new() -> Self {
        OscillatorBackend {
            phase: 0.0,
            time: 0.0,
            omega: 0.05,
            amplitude: 1.0,
            store: HashMap::new(),
        }
    }
}

impl Default for OscillatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorFacade for OscillatorBackend {
    fn execute(&mut self, op: ExecuteOp) -> Result<(), FfsError> {
        match op {
            ExecuteOp::Init | ExecuteOp::Finish => Ok(()),
            ExecuteOp::Run => {
                self.phase += self.omega;
                self.time += 1.0;
                Ok(())
            }
        }
    }

    fn state(&mut self, op: StateOp, state_ref: StateRef) -> Result<(), FfsError> {
        let stub = state_ref.stub();
        match op {
            StateOp::Init => {
                self.phase = 0.0;
                self.time = 0.0;
                Ok(())
            }
            StateOp::Read => {
                let record = self.store.get(&stub).ok_or_else(|| {
                    FfsError::Storage(format!("no stored state for '{stub}'"))
                })?;
                self.phase = record.phase;
                Ok(())
            }
            StateOp::Write => {
                let bytes = bincode::serialize(&OscillatorRecord { phase: self.phase })
                    .map_err(|e| FfsError::Storage(e.to_string()))?;
                let record: OscillatorRecord =
                    bincode::deserialize(&bytes).map_err(|e| FfsError::Storage(e.to_string()))?;
                self.store.insert(stub, record);
                Ok(())
            }
            StateOp::Delete => {
                self.store.remove(&stub);
                Ok(())
            }
        }
    }

    fn lambda(&mut self) -> Result<f64, FfsError> {
        Ok(self.amplitude * self.phase.sin())
    }

    fn time(&mut self) -> Result<f64, FfsError> {
        Ok(self.time)
    }

    fn info(&mut self, _topic: InfoTopic, _value: i64) -> Result<(), FfsError> {
        Ok(())
    }
}
