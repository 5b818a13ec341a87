//! # ffs_core
//!
//! A Forward Flux Sampling engine: drives a black-box simulator across
//! a ladder of order-parameter interfaces to estimate the rate of a
//! rare transition between two stable states, `A` and `B`.
//!
//! The crate is organized bottom-up:
//!
//! - [`error`] — the shared error taxonomy.
//! - [`rng`] — the deterministic LCG used for every reproducibility-
//!   critical random choice.
//! - [`interface`] — the interface ladder (`lambda`, trial counts,
//!   pruning probabilities).
//! - [`state`] — opaque references to persisted simulator state.
//! - [`facade`] — the simulator-facing trait boundary, plus test
//!   backends.
//! - [`ensemble`] — weight-biased collections of successful crossings.
//! - [`trial`] — the two run-forward primitives every algorithm is
//!   built from.
//! - [`pruning`] — the biased-retreat protocol applied when a trial
//!   would otherwise be discarded outright.
//! - [`flux`] — the initial-flux estimator at interface 1.
//! - [`algorithm`] — the four interface-advancement drivers (direct,
//!   branched, Rosenbluth, brute-force).
//! - [`result`] — per-interface counters and the Φ_A / P(B|A) / rate
//!   reduction.
//! - [`comm`] — the collective-communication abstraction standing in
//!   for MPI.
//! - [`instance`] — the per-instance state machine tying the above
//!   together.
//! - [`config`] — TOML configuration loading and validation.

pub mod algorithm;
pub mod comm;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod facade;
pub mod flux;
pub mod instance;
pub mod interface;
pub mod pruning;
pub mod result;
pub mod rng;
pub mod state;
pub mod trial;
