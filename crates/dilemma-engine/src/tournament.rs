//! Round-robin tournament engine
//!
//! Concrete [`SimulationEngine`] implementation: every unordered roster
//! pair plays one iterated match per repetition. Each match derives its own
//! seed from (base seed, repetition, pair), so a tournament is a pure
//! function of roster, payoff and settings.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use dilemma_common::{
    AgentSpec, EngineError, MatchSettings, PayoffMatrix, RawTournament, SimulationEngine,
    StateDistribution,
};

use crate::match_play::IteratedMatch;

/// Deterministic round-robin tournament engine
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinEngine;

impl RoundRobinEngine {
    pub fn new() -> Self {
        Self
    }
}

/// splitmix64 finalizer over (base, repetition, pair)
fn match_seed(base: u64, rep: u32, i: usize, j: usize) -> u64 {
    let mut x = base ^ (u64::from(rep) << 40) ^ ((i as u64) << 20) ^ (j as u64);
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

#[async_trait]
impl SimulationEngine for RoundRobinEngine {
    async fn run_tournament(
        &self,
        roster: &[AgentSpec],
        payoff: &PayoffMatrix,
        settings: &MatchSettings,
    ) -> Result<RawTournament, EngineError> {
        let n = roster.len();
        if n < 2 {
            return Err(EngineError::RosterTooSmall(n));
        }

        let reps = settings.repetitions.max(1) as usize;
        let game = IteratedMatch::new(*payoff, settings.turns, settings.prob_end);

        // normalised_scores[agent][rep]: mean per-turn score across opponents
        let mut normalised_scores = vec![vec![0.0_f64; reps]; n];
        // state_acc[agent][opponent]: (cc, cd, dc, dd) fractions summed over reps
        let mut state_acc = vec![vec![[0.0_f64; 4]; n]; n];

        for rep in 0..reps {
            for i in 0..n {
                for j in (i + 1)..n {
                    let mut rng =
                        StdRng::seed_from_u64(match_seed(settings.seed, rep as u32, i, j));
                    let outcome = game.play(&roster[i].policy, &roster[j].policy, &mut rng);

                    normalised_scores[i][rep] += outcome.normalised_score_a();
                    normalised_scores[j][rep] += outcome.normalised_score_b();

                    let a_view = outcome.states_a.normalised(outcome.turns_played);
                    let b_view = outcome
                        .states_a
                        .mirrored()
                        .normalised(outcome.turns_played);
                    accumulate(&mut state_acc[i][j], a_view);
                    accumulate(&mut state_acc[j][i], b_view);
                }
            }
        }

        let opponents = (n - 1) as f64;
        for row in &mut normalised_scores {
            for score in row.iter_mut() {
                *score /= opponents;
            }
        }

        let reps_f = reps as f64;
        let state_distribution: Vec<Vec<StateDistribution>> = state_acc
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|[cc, cd, dc, dd]| StateDistribution {
                        cc: cc / reps_f,
                        cd: cd / reps_f,
                        dc: dc / reps_f,
                        dd: dd / reps_f,
                    })
                    .collect()
            })
            .collect();

        debug!(
            agents = n,
            repetitions = reps,
            turns = settings.turns,
            "round-robin tournament complete"
        );

        Ok(RawTournament {
            names: roster.iter().map(|a| a.name.clone()).collect(),
            normalised_scores,
            state_distribution,
        })
    }
}

fn accumulate(acc: &mut [f64; 4], dist: StateDistribution) {
    acc[0] += dist.cc;
    acc[1] += dist.cd;
    acc[2] += dist.dc;
    acc[3] += dist.dd;
}
