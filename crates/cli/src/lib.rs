//! Command-line driver for the ring and sharding crates.
//!
//! Provides commands for:
//! - Comparing remapping impact of modulo sharding and consistent hashing
//! - Inspecting key distribution per server
//! - Listing replica placements for keys
//! - Measuring a single membership change on one scheme

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult, Scheme, Workload};
pub use config::CliConfig;
