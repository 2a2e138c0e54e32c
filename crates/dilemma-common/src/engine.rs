//! The simulation engine seam
//!
//! The aggregation pipeline treats the pairwise competition engine as a
//! black box behind [`SimulationEngine`]: given an ordered roster of agent
//! policy handles and a payoff configuration, it returns a per-agent score
//! matrix and per-agent-pair outcome-state distributions. The pipeline only
//! consumes this output shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{AgentSpec, PayoffMatrix};

/// Tournament construction parameters
///
/// Match-length, termination and repetition policy is a configuration
/// concern, not an algorithmic one. Defaults: 30-turn matches with a 0.1
/// end probability, one repetition, base seed 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Cap on turns per iterated match
    pub turns: u32,
    /// Per-round probability that a match ends early
    pub prob_end: f64,
    /// Number of times the whole tournament is repeated
    pub repetitions: u32,
    /// Base seed; every match derives its own deterministic seed from it
    pub seed: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            turns: crate::DEFAULT_TURNS,
            prob_end: crate::DEFAULT_PROB_END,
            repetitions: crate::DEFAULT_REPETITIONS,
            seed: crate::DEFAULT_SEED,
        }
    }
}

/// Normalised outcome-state distribution for one ordered agent pair
///
/// Fractions of turns that ended in each joint state, from the row agent's
/// perspective. The four fields sum to 1 for any pair that actually played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDistribution {
    /// Mutual cooperation
    pub cc: f64,
    /// I cooperated, they defected
    pub cd: f64,
    /// I defected, they cooperated
    pub dc: f64,
    /// Mutual defection
    pub dd: f64,
}

/// Raw engine output for one tournament invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTournament {
    /// Roster names in the order the engine received them
    pub names: Vec<String>,
    /// Normalised (per-turn) score per agent per repetition:
    /// `normalised_scores[agent][repetition]`
    pub normalised_scores: Vec<Vec<f64>>,
    /// Outcome-state distribution per ordered pair, averaged across
    /// repetitions: `state_distribution[agent][opponent]`. The diagonal
    /// (an agent against itself) is all zeros.
    pub state_distribution: Vec<Vec<StateDistribution>>,
}

impl RawTournament {
    /// Number of agents this result describes
    pub fn agents(&self) -> usize {
        self.names.len()
    }

    /// Check the output shape against an expected roster size
    pub fn check_shape(&self, expected: usize) -> std::result::Result<(), EngineError> {
        let well_formed = self.names.len() == expected
            && self.normalised_scores.len() == expected
            && self.state_distribution.len() == expected
            && self.state_distribution.iter().all(|row| row.len() == expected)
            && self.normalised_scores.iter().all(|row| !row.is_empty());
        if well_formed {
            Ok(())
        } else {
            Err(EngineError::MalformedOutput {
                expected,
                actual: self.names.len(),
            })
        }
    }
}

/// The pairwise competition engine boundary
///
/// The per-invocation call may be arbitrarily expensive; it is the dominant
/// cost of the whole pipeline and the only unbounded-latency operation.
#[async_trait]
pub trait SimulationEngine: Send + Sync {
    /// Run one round-robin tournament over the given roster
    async fn run_tournament(
        &self,
        roster: &[AgentSpec],
        payoff: &PayoffMatrix,
        settings: &MatchSettings,
    ) -> std::result::Result<RawTournament, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_shape_accepts_square_output() {
        let raw = RawTournament {
            names: vec!["A".into(), "B".into()],
            normalised_scores: vec![vec![1.0], vec![0.5]],
            state_distribution: vec![
                vec![StateDistribution::default(); 2],
                vec![StateDistribution::default(); 2],
            ],
        };
        assert!(raw.check_shape(2).is_ok());
    }

    #[test]
    fn test_check_shape_rejects_missing_row() {
        let raw = RawTournament {
            names: vec!["A".into(), "B".into()],
            normalised_scores: vec![vec![1.0]],
            state_distribution: vec![vec![StateDistribution::default(); 2]],
        };
        assert!(raw.check_shape(2).is_err());
    }
}
