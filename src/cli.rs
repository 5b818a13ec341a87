//! # CLI Module
//!
//! The minimum-viable CLI surface from spec.md §6: a single positional
//! configuration-file argument. `-v`/`-q` and `--threads` are ambient
//! concerns (logging verbosity, thread-pool sizing), not part of the
//! core's contract.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Forward Flux Sampling engine", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file describing the instances to run.
    pub config: PathBuf,

    /// Increase log verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease log verbosity; repeatable.
    #[arg(short = 'q', long = "quiet", action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Override the number of OS threads used for the cross-instance
    /// fan-out (defaults to rayon's own heuristic).
    #[arg(long)]
    pub threads: Option<usize>,
}

impl Cli {
    /// Resolves the effective `log::LevelFilter` from the verbose/quiet
    /// counters, with `info` as the baseline.
    pub fn log_level(&self) -> log::LevelFilter {
        use log::LevelFilter::*;
        let base = 2i8; // Info
        let level = base + self.verbose as i8 - self.quiet as i8;
        match level.clamp(0, 4) {
            0 => Error,
            1 => Warn,
            2 => Info,
            3 => Debug,
            _ => Trace,
        }
    }
}
