//! # Dilemma Common
//!
//! Shared types, errors and the engine seam for the Dilemma experiment
//! workspace.
//!
//! ## Core Types
//!
//! - [`PayoffMatrix`]: the R/P/S/T payoff configuration of the stage game
//! - [`Action`]/[`MemoryOnePolicy`]: deterministic memory-one strategy specs
//! - [`AgentSpec`]: agent identity (name) plus its opaque policy handle
//! - [`MatchSettings`]: tournament construction parameters (turns, end
//!   probability, repetitions, seed)
//! - [`RawTournament`]: the raw per-agent score matrix and per-pair
//!   outcome-state distributions an engine returns
//!
//! ## Engine Seam
//!
//! [`SimulationEngine`] is the trait boundary between the aggregation
//! pipeline and the pairwise competition engine. The pipeline only consumes
//! the engine's output shape; it never inspects policy internals.

pub mod engine;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use engine::{MatchSettings, RawTournament, SimulationEngine, StateDistribution};
pub use error::{DilemmaError, EngineError, PartitionError, PersistError, Result};
pub use types::{
    payoff::PayoffMatrix,
    strategy::{Action, AgentSpec, MemoryOnePolicy},
};

/// Workspace version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default cap on turns per iterated match
pub const DEFAULT_TURNS: u32 = 30;

/// Default per-round probability that a match ends early
pub const DEFAULT_PROB_END: f64 = 0.1;

/// Default number of tournament repetitions per team
pub const DEFAULT_REPETITIONS: u32 = 1;

/// Default base seed for match randomness
pub const DEFAULT_SEED: u64 = 1;
