//! # State Reference Module
//!
//! `C3`: an opaque handle identifying one persisted copy of simulator
//! state. A `StateRef` names a state, it does not hold one — reading,
//! writing, and deleting the bytes behind it goes through the
//! [`crate::facade::SimulatorFacade`].


use std::fmt;

/// An opaque reference to one persisted simulator state.
///
/// Identified by the triple `(instance, proxy, trial_id)`, mirroring the
/// `(inst_id, ngrp_id, id)` triple the reference implementation derives
/// its stub filename from. Two `StateRef`s are equal exactly when the
/// triple matches, regardless of `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StateRef {
    instance: usize,
    proxy: usize,
    trial_id: u64,
    /// Disambiguates two `StateRef`s that share a `(instance, proxy,
    /// trial_id)` triple but were written at different points in time
    /// (e.g. a harvested state later overwritten for a new trial). Not
    /// part of the facade's stub naming, only used for local bookkeeping
    /// and `Debug` output.
    generation: u64,
}

impl StateRef {
    /// Creates a new reference at generation 0.
    pub fn new(instance: usize, proxy: usize, trial_id: u64) -> Self {
        StateRef {
            instance,
            proxy,
            trial_id,
            generation: 0,
        }
    }

    /// Returns a copy of this reference bumped to the next generation,
    /// used when a state slot is overwritten in place (e.g. pruning
    /// retreating a trial back to an earlier checkpoint under the same
    /// trial id).
    pub fn next_generation(self) -> Self {
        StateRef {
            generation: self.generation + 1,
            ..self
        }
    }

    pub fn instance(&self) -> usize {
        self.instance
    }

    pub fn proxy(&self) -> usize {
        self.proxy
    }

    pub fn trial_id(&self) -> u64 {
        self.trial_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The stub identifier the facade uses to name this state's backing
    /// file(s), following the reference implementation's
    /// `inst<N>_grp<N>_id<N>` convention.
    pub fn stub(&self) -> String {
        format!(
            "inst{}_grp{}_id{}",
            self.instance, self.proxy, self.trial_id
        )
    }
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.stub(), self.generation)
    }
}
