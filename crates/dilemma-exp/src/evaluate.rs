//! Team evaluation
//!
//! Wraps one engine invocation per team and normalizes the raw score
//! matrix and outcome-state histograms into a fixed-shape [`TeamResult`].
//! The engine call is the dominant cost of the pipeline and the only
//! unbounded-latency operation, so it runs under a timeout; a timeout is
//! surfaced as a recoverable engine error.

use std::sync::Arc;
use std::time::Duration;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use dilemma_common::{
    AgentSpec, EngineError, MatchSettings, PartitionError, PayoffMatrix, RawTournament, Result,
    SimulationEngine,
};

use crate::partition::Team;
use crate::universe::Universe;

/// Which cooperation-fraction normalization feeds the distribution columns
///
/// Both variants coexist in the result schema under explicit names; this
/// selects the one the system aggregates are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CooperationNorm {
    /// Sum each member's mutual-cooperation fractions across pairings,
    /// divide by (members - 1), average across members
    #[default]
    PerOpponent,
    /// Plain mean of the mutual-cooperation fraction over all ordered pairs
    PerPair,
}

/// Per-team outcome record, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    /// Member names, sorted
    pub members: Vec<String>,
    /// Mean normalised score across members and repetitions
    pub avg_norm_score: f64,
    /// Minimum normalised score across members and repetitions
    pub min_norm_score: f64,
    /// Mutual-cooperation fraction, per-opponent normalization
    pub cc_per_opponent: f64,
    /// Mutual-cooperation fraction, per-pair normalization
    pub cc_per_pair: f64,
}

impl TeamResult {
    /// Members as a single comma-joined string
    pub fn names(&self) -> String {
        self.members.join(",")
    }

    /// The cooperation metric under the selected normalization
    pub fn cc(&self, norm: CooperationNorm) -> f64 {
        match norm {
            CooperationNorm::PerOpponent => self.cc_per_opponent,
            CooperationNorm::PerPair => self.cc_per_pair,
        }
    }
}

/// One engine call per team, normalized into a [`TeamResult`]
pub struct TeamEvaluator {
    engine: Arc<dyn SimulationEngine>,
    settings: MatchSettings,
    timeout: Duration,
}

impl TeamEvaluator {
    pub fn new(engine: Arc<dyn SimulationEngine>, settings: MatchSettings, timeout: Duration) -> Self {
        Self {
            engine,
            settings,
            timeout,
        }
    }

    /// Evaluate one team under the given payoff configuration
    ///
    /// Member names are resolved against the universe before any engine
    /// work; an unknown name is a precondition violation. Any engine error
    /// is fatal for the enclosing system.
    pub async fn evaluate(
        &self,
        team: &Team,
        universe: &Universe,
        payoff: &PayoffMatrix,
    ) -> Result<TeamResult> {
        let roster: Vec<AgentSpec> = team
            .members()
            .iter()
            .map(|name| {
                universe
                    .get(name)
                    .cloned()
                    .ok_or_else(|| PartitionError::UnknownElement(name.clone()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let raw = tokio::time::timeout(
            self.timeout,
            self.engine.run_tournament(&roster, payoff, &self.settings),
        )
        .await
        .map_err(|_| EngineError::Timeout {
            team: team.joined(),
            limit_ms: self.timeout.as_millis() as u64,
        })??;

        raw.check_shape(roster.len())?;

        debug!(team = %team.joined(), "team evaluated");
        Ok(normalize(team, &raw))
    }
}

/// Fold the raw engine output into scalar team metrics
fn normalize(team: &Team, raw: &RawTournament) -> TeamResult {
    let n = raw.agents();

    let all_scores = raw.normalised_scores.iter().flatten().copied();
    let score_count = raw
        .normalised_scores
        .iter()
        .map(|row| row.len())
        .sum::<usize>();
    let avg_norm_score = all_scores.clone().sum::<f64>() / score_count as f64;
    let min_norm_score = all_scores
        .map(OrderedFloat)
        .min()
        .map(|m| m.0)
        .unwrap_or_default();

    // Per-opponent: each member's CC fractions summed over pairings, scaled
    // by 1/(members-1), then averaged over members. Per-pair: plain mean
    // over ordered pairs.
    let opponents = (n - 1).max(1) as f64;
    let mut per_member_total = 0.0;
    let mut pair_total = 0.0;
    let mut pair_count = 0_usize;
    for (i, row) in raw.state_distribution.iter().enumerate() {
        let mut member_sum = 0.0;
        for (j, dist) in row.iter().enumerate() {
            if i == j {
                continue;
            }
            member_sum += dist.cc;
            pair_total += dist.cc;
            pair_count += 1;
        }
        per_member_total += member_sum / opponents;
    }
    let cc_per_opponent = per_member_total / n as f64;
    let cc_per_pair = if pair_count == 0 {
        0.0
    } else {
        pair_total / pair_count as f64
    };

    TeamResult {
        members: team.members().to_vec(),
        avg_norm_score,
        min_norm_score,
        cc_per_opponent,
        cc_per_pair,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dilemma_common::StateDistribution;

    /// Engine stub returning a canned result
    struct FixedEngine {
        raw: RawTournament,
    }

    #[async_trait]
    impl SimulationEngine for FixedEngine {
        async fn run_tournament(
            &self,
            _roster: &[AgentSpec],
            _payoff: &PayoffMatrix,
            _settings: &MatchSettings,
        ) -> std::result::Result<RawTournament, EngineError> {
            Ok(self.raw.clone())
        }
    }

    /// Engine stub that never finishes
    struct StuckEngine;

    #[async_trait]
    impl SimulationEngine for StuckEngine {
        async fn run_tournament(
            &self,
            _roster: &[AgentSpec],
            _payoff: &PayoffMatrix,
            _settings: &MatchSettings,
        ) -> std::result::Result<RawTournament, EngineError> {
            std::future::pending().await
        }
    }

    fn universe() -> Universe {
        Universe::from_catalog(
            &["Cooperator", "Defector", "Tit For Tat"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    fn team() -> Team {
        Team::new(vec![
            "Cooperator".into(),
            "Defector".into(),
            "Tit For Tat".into(),
        ])
        .unwrap()
    }

    fn dist(cc: f64) -> StateDistribution {
        StateDistribution {
            cc,
            cd: 0.0,
            dc: 0.0,
            dd: 1.0 - cc,
        }
    }

    fn canned_raw() -> RawTournament {
        RawTournament {
            names: vec!["Cooperator".into(), "Defector".into(), "Tit For Tat".into()],
            normalised_scores: vec![vec![0.5], vec![2.0], vec![1.1]],
            state_distribution: vec![
                vec![dist(0.0), dist(0.2), dist(0.4)],
                vec![dist(0.2), dist(0.0), dist(0.6)],
                vec![dist(0.4), dist(0.6), dist(0.0)],
            ],
        }
    }

    #[tokio::test]
    async fn test_normalizes_scores_and_cc_metrics() {
        let evaluator = TeamEvaluator::new(
            Arc::new(FixedEngine { raw: canned_raw() }),
            MatchSettings::default(),
            Duration::from_secs(5),
        );

        let result = evaluator
            .evaluate(&team(), &universe(), &PayoffMatrix::classic())
            .await
            .unwrap();

        assert!((result.avg_norm_score - (0.5 + 2.0 + 1.1) / 3.0).abs() < 1e-12);
        assert_eq!(result.min_norm_score, 0.5);

        // per member: (0.2+0.4)/2, (0.2+0.6)/2, (0.4+0.6)/2 -> mean 0.4
        assert!((result.cc_per_opponent - 0.4).abs() < 1e-12);
        // six ordered pairs summing to 2.4 -> 0.4
        assert!((result.cc_per_pair - 0.4).abs() < 1e-12);
        assert_eq!(
            result.cc(CooperationNorm::PerOpponent),
            result.cc_per_opponent
        );
    }

    #[tokio::test]
    async fn test_unknown_member_fails_before_engine_call() {
        let evaluator = TeamEvaluator::new(
            Arc::new(StuckEngine),
            MatchSettings::default(),
            Duration::from_secs(5),
        );
        let ghost_team = Team::new(vec!["Ghost".into(), "Cooperator".into()]).unwrap();

        // StuckEngine would hang forever; resolution must fail first
        let err = evaluator
            .evaluate(&ghost_team, &universe(), &PayoffMatrix::classic())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Ghost"));
    }

    #[tokio::test]
    async fn test_engine_timeout_is_recoverable() {
        let evaluator = TeamEvaluator::new(
            Arc::new(StuckEngine),
            MatchSettings::default(),
            Duration::from_millis(10),
        );

        let err = evaluator
            .evaluate(&team(), &universe(), &PayoffMatrix::classic())
            .await
            .unwrap_err();
        match err {
            dilemma_common::DilemmaError::Engine(e) => assert!(e.is_recoverable()),
            other => panic!("expected engine error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_output_rejected() {
        let mut raw = canned_raw();
        raw.normalised_scores.pop();
        let evaluator = TeamEvaluator::new(
            Arc::new(FixedEngine { raw }),
            MatchSettings::default(),
            Duration::from_secs(5),
        );

        let err = evaluator
            .evaluate(&team(), &universe(), &PayoffMatrix::classic())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            dilemma_common::DilemmaError::Engine(EngineError::MalformedOutput { .. })
        ));
    }
}
