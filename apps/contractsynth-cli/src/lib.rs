//! ContractSynth command-line front end
//!
//! Configuration loading and the subcommand implementations live here so
//! they can be tested without spawning the binary.

pub mod commands;
pub mod config;

pub use commands::Artifact;
pub use config::Config;
