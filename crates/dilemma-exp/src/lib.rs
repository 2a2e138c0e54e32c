//! # Dilemma Exp
//!
//! Exhaustive team-partition experiments over pairwise competitive
//! simulations.
//!
//! A fixed universe of n agents is split into disjoint teams of size k in
//! every possible way; each team plays a round-robin tournament through the
//! [`SimulationEngine`](dilemma_common::SimulationEngine) seam, and per-team
//! outcomes are aggregated into per-partition ("system") and per-experiment
//! statistics.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    ExperimentRunner                      │
//! │   partitions ──► SystemAggregator ──► ExperimentTable    │
//! │                        │                   │             │
//! │                  TeamEvaluator        checkpoints        │
//! │                        │              (every 100 rows)   │
//! │                 SimulationEngine                         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Components
//!
//! - [`Partitions`]: lazy, duplicate-free enumeration of all ways to split
//!   the universe into k-sized teams (anchor-elimination recursion)
//! - [`IdentityCodec`]: stable element ranks and System ID encoding
//! - [`TeamEvaluator`]: one engine call per team, normalized into a
//!   [`TeamResult`]
//! - [`SystemAggregator`]: cross-team extrema/averages per partition
//! - [`ExperimentRunner`]: sequential drive, append-only table, periodic
//!   checkpoints and progress reports

pub mod codec;
pub mod config;
pub mod evaluate;
pub mod experiment;
pub mod partition;
pub mod persist;
pub mod system;
pub mod universe;

// Re-export core types
pub use codec::IdentityCodec;
pub use config::ExpConfig;
pub use evaluate::{CooperationNorm, TeamEvaluator, TeamResult};
pub use experiment::{ExperimentRunner, ExperimentTable};
pub use partition::{partition_count, AnchorPolicy, Partition, Partitions, Team};
pub use system::{SystemAggregator, SystemResult};
pub use universe::Universe;

/// Crate version
pub const EXP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows between checkpoint snapshots
pub const CHECKPOINT_INTERVAL: usize = 100;

/// Partitions between progress reports
pub const PROGRESS_INTERVAL: usize = 1000;

/// Default team size k
pub const DEFAULT_TEAM_SIZE: usize = 2;

/// Default per-team engine-call timeout in seconds
pub const DEFAULT_TEAM_TIMEOUT_SECS: u64 = 300;
