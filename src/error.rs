//! Error taxonomy for the FFS core.
//!
//! Mirrors the six error kinds from the specification's error-handling
//! design: configuration, facade initialization, trial-runtime, storage,
//! reduction, and pruning exhaustion. Pruning exhaustion is not a variant
//! here — it is the ordinary `TrialStatus::Pruned` outcome, not a failure.

use thiserror::Error;

/// Errors surfaced by the FFS core.
///
/// `TrialRuntime` and `Storage` are recoverable at the call site (the
/// trial is charged as failed, or the write/delete is logged and
/// skipped); every other variant is fatal to the owning instance.
#[derive(Debug, Error)]
pub enum FfsError {
    /// Missing/invalid configuration keys, or an inconsistent division of
    /// trials across proxies. Fatal before any trial runs.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The simulator backend failed to initialize or load its reference
    /// state. Fatal for the instance.
    #[error("facade initialization failed: {0}")]
    FacadeInit(String),

    /// A facade `run`/`lambda`/`state` call returned an error mid-trial.
    /// The trial is charged as neither success nor prune; the driver
    /// continues with the next trial.
    #[error("trial runtime error: {0}")]
    TrialRuntime(String),

    /// A state WRITE or DELETE failed. Logged and the caller continues;
    /// no collective operation is retried from here.
    #[error("storage error: {0}")]
    Storage(String),

    /// A collective reduction failed (or a peer proxy signalled failure
    /// during the two-phase collective barrier). Fatal; aborts the
    /// instance.
    #[error("reduction error: {0}")]
    Reduction(String),
}

/// Convenience alias used throughout the crate.
pub type FfsResult<T> = Result<T, FfsError>;
