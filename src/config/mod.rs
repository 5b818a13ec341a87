//! # Configuration Module
//!
//! Ambient stack: loads and validates the TOML configuration document
//! described in spec.md §6 (`[ffs]`, `[[ffs_inst]]`, nested interface
//! tables), producing typed [`crate::instance::InstanceConfig`] values
//! the binary hands to one [`crate::instance::InstanceController`] per
//! configured instance. Section/field names follow
//! `examples/original_source/src/ffs/ffs_param.c`'s key-value block
//! layout, translated into TOML tables.


use serde::Deserialize;

use crate::algorithm::StepBudget;
use crate::error::FfsError;
use crate::flux::FluxParams;
use crate::instance::{AlgorithmKind, InstanceConfig};
use crate::interface::InterfaceTable;

#[derive(Debug, Deserialize)]
pub struct RawConfig {
    pub ffs: RawFfs,
    #[serde(rename = "ffs_inst")]
    pub instances: Vec<RawInstance>,
}

#[derive(Debug, Deserialize)]
pub struct RawFfs {
    pub master_seed: u64,
}

#[derive(Debug, Deserialize)]
pub struct RawInstance {
    pub method: String,
    pub backend: String,
    pub nproxy: usize,
    #[serde(default)]
    pub teq: f64,
    pub nstepmax: usize,
    #[serde(default = "default_prob_accept")]
    pub prob_accept: f64,
    #[serde(default)]
    pub init_independent: bool,
    #[serde(default = "default_nskip")]
    pub nskip: u64,
    #[serde(default = "default_nsteplambda")]
    pub nsteplambda: usize,
    #[serde(default)]
    pub bruteforce_t_max: f64,
    pub interfaces: RawInterfaces,
}

fn default_prob_accept() -> f64 {
    1.0
}

fn default_nsteplambda() -> usize {
    1
}

fn default_nskip() -> u64 {
    1
}

/// Either a `lambda_a`/`lambda_b` uniform-spacing shortcut, or an
/// explicit per-interface table list, mirroring `ffs_param_lambda_ab_set`
/// vs. the fully-explicit `interface<N> { ... }` blocks spec.md §6
/// describes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawInterfaces {
    Uniform {
        nlambda: usize,
        lambda_a: f64,
        lambda_b: f64,
        ntrial: usize,
        nstate_target: usize,
        nstate_keep: usize,
        pprune: f64,
    },
    Explicit {
        interface: Vec<RawInterface>,
    },
}

#[derive(Debug, Deserialize)]
pub struct RawInterface {
    pub lambda: f64,
    pub ntrial: usize,
    pub nstate_target: usize,
    pub nstate_keep: usize,
    pub pprune: f64,
}

/// One fully-lowered, validated instance ready to be handed to an
/// [`crate::instance::InstanceController`].
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    pub backend: String,
    pub config: InstanceConfig,
}

/// Parses and lowers a TOML configuration document into one
/// [`InstanceSpec`] per `[[ffs_inst]]` table.
///
/// Each instance's base seed is derived from `master_seed` and the
/// instance's position in the document, so the same document always
/// produces the same per-instance seeds regardless of how many
/// instances happen to run concurrently in one process (the
/// "independent replicate seeding" guarantee from SPEC_FULL §9).
pub fn parse(document: &str) -> Result<Vec<InstanceSpec>, FfsError> {
    let raw: RawConfig =
        toml::from_str(document).map_err(|e| FfsError::Configuration(e.to_string()))?;

    if raw.instances.is_empty() {
        return Err(FfsError::Configuration(
            "configuration must define at least one [[ffs_inst]] table".into(),
        ));
    }

    raw.instances
        .iter()
        .enumerate()
        .map(|(index, inst)| lower_instance(&raw.ffs, index, inst))
        .collect()
}

fn lower_instance(
    ffs: &RawFfs,
    index: usize,
    inst: &RawInstance,
) -> Result<InstanceSpec, FfsError> {
    let algorithm = match inst.method.as_str() {
        "direct" => AlgorithmKind::Direct,
        "branched" => AlgorithmKind::Branched,
        "rosenbluth" => AlgorithmKind::Rosenbluth,
        "bruteforce" | "brute-force" | "brute_force" => AlgorithmKind::BruteForce,
        other => {
            return Err(FfsError::Configuration(format!(
                "instance {index}: unknown method '{other}'"
            )))
        }
    };

    let interfaces = match &inst.interfaces {
        RawInterfaces::Uniform {
            nlambda,
            lambda_a,
            lambda_b,
            ntrial,
            nstate_target,
            nstate_keep,
            pprune,
        } => InterfaceTable::uniform(
            *nlambda,
            *lambda_a,
            *lambda_b,
            *ntrial,
            *nstate_target,
            *nstate_keep,
            *pprune,
        )?,
        RawInterfaces::Explicit { interface } => {
            let lambdas: Vec<f64> = interface.iter().map(|i| i.lambda).collect();
            let ntrial: Vec<usize> = interface.iter().map(|i| i.ntrial).collect();
            let nstate_target: Vec<usize> = interface.iter().map(|i| i.nstate_target).collect();
            let nstate_keep: Vec<usize> = interface.iter().map(|i| i.nstate_keep).collect();
            let pprune: Vec<f64> = interface.iter().map(|i| i.pprune).collect();
            InterfaceTable::new(&lambdas, &ntrial, &nstate_target, &nstate_keep, &pprune)?
        }
    };

    let base_seed = derive_instance_seed(ffs.master_seed, index);

    let config = InstanceConfig {
        interfaces,
        algorithm,
        nproxy: inst.nproxy,
        base_seed,
        flux: FluxParams {
            teq: inst.teq,
            nstepmax: inst.nstepmax,
            prob_accept: inst.prob_accept,
            init_independent: inst.init_independent,
            nskip: inst.nskip,
        },
        budget: StepBudget {
            nsteplambda: inst.nsteplambda,
            nstepmax: inst.nstepmax,
        },
        bruteforce_t_max: inst.bruteforce_t_max,
    };

    Ok(InstanceSpec {
        backend: inst.backend.clone(),
        config,
    })
}

/// Splitmix64-style mixing of `master_seed` with the instance index, so
/// distinct instances never share a base seed even for adjacent
/// indices, while the whole document stays reproducible from
/// `master_seed` alone.
fn derive_instance_seed(master_seed: u64, index: usize) -> u64 {
    let mut z = master_seed.wrapping_add(0x9E3779B97F4A7C15u64.wrapping_mul(index as u64 + 1));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
