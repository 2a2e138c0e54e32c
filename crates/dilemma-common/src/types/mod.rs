//! Shared data types for the Dilemma workspace

pub mod payoff;
pub mod strategy;

pub use payoff::PayoffMatrix;
pub use strategy::{Action, AgentSpec, MemoryOnePolicy};
