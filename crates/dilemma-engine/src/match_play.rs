//! Iterated two-player match
//!
//! Plays a single iterated match between two memory-one policies under a
//! payoff configuration: at most `turns` rounds, with a seeded per-round
//! early-termination probability. Scoring and state counting happen from
//! the first player's perspective; the second player's view is the mirror.

use rand::rngs::StdRng;
use rand::Rng;

use dilemma_common::{Action, MemoryOnePolicy, PayoffMatrix, StateDistribution};

/// Joint-state counts from one player's perspective
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub cc: u32,
    pub cd: u32,
    pub dc: u32,
    pub dd: u32,
}

impl StateCounts {
    fn record(&mut self, mine: Action, theirs: Action) {
        match (mine, theirs) {
            (Action::Cooperate, Action::Cooperate) => self.cc += 1,
            (Action::Cooperate, Action::Defect) => self.cd += 1,
            (Action::Defect, Action::Cooperate) => self.dc += 1,
            (Action::Defect, Action::Defect) => self.dd += 1,
        }
    }

    /// The same history seen from the opponent's side
    pub fn mirrored(&self) -> Self {
        Self {
            cc: self.cc,
            cd: self.dc,
            dc: self.cd,
            dd: self.dd,
        }
    }

    /// Counts as fractions of the turns actually played
    pub fn normalised(&self, turns_played: u32) -> StateDistribution {
        if turns_played == 0 {
            return StateDistribution::default();
        }
        let n = f64::from(turns_played);
        StateDistribution {
            cc: f64::from(self.cc) / n,
            cd: f64::from(self.cd) / n,
            dc: f64::from(self.dc) / n,
            dd: f64::from(self.dd) / n,
        }
    }
}

/// Result of one iterated match
#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome {
    /// Rounds actually played (1..=turns cap)
    pub turns_played: u32,
    /// First player's total payoff
    pub score_a: f64,
    /// Second player's total payoff
    pub score_b: f64,
    /// Joint-state counts from the first player's perspective
    pub states_a: StateCounts,
}

impl MatchOutcome {
    /// First player's payoff per turn played
    pub fn normalised_score_a(&self) -> f64 {
        self.score_a / f64::from(self.turns_played)
    }

    /// Second player's payoff per turn played
    pub fn normalised_score_b(&self) -> f64 {
        self.score_b / f64::from(self.turns_played)
    }
}

/// One iterated match between two policies
#[derive(Debug, Clone, Copy)]
pub struct IteratedMatch {
    payoff: PayoffMatrix,
    turns: u32,
    prob_end: f64,
}

impl IteratedMatch {
    pub fn new(payoff: PayoffMatrix, turns: u32, prob_end: f64) -> Self {
        Self {
            payoff,
            turns,
            prob_end,
        }
    }

    /// Play the match to completion
    ///
    /// The rng drives only early termination; deterministic policies make
    /// the move sequence itself a pure function of the two policies.
    pub fn play(&self, a: &MemoryOnePolicy, b: &MemoryOnePolicy, rng: &mut StdRng) -> MatchOutcome {
        let mut last: Option<(Action, Action)> = None;
        let mut outcome = MatchOutcome {
            turns_played: 0,
            score_a: 0.0,
            score_b: 0.0,
            states_a: StateCounts::default(),
        };

        for _ in 0..self.turns {
            let a_move = a.next_move(last);
            let b_move = b.next_move(last.map(|(mine, theirs)| (theirs, mine)));

            let (pay_a, pay_b) = self.payoff.score(a_move, b_move);
            outcome.score_a += pay_a;
            outcome.score_b += pay_b;
            outcome.states_a.record(a_move, b_move);
            outcome.turns_played += 1;

            last = Some((a_move, b_move));
            if self.prob_end > 0.0 && rng.gen::<f64>() < self.prob_end {
                break;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use rand::SeedableRng;

    fn policy(name: &str) -> MemoryOnePolicy {
        catalog::by_name(name).unwrap().policy
    }

    fn fixed_length_match() -> IteratedMatch {
        // prob_end = 0 gives exactly `turns` rounds
        IteratedMatch::new(PayoffMatrix::classic(), 10, 0.0)
    }

    #[test]
    fn test_mutual_cooperators_score_r_per_turn() {
        let mut rng = StdRng::seed_from_u64(1);
        let coop = policy("Cooperator");
        let outcome = fixed_length_match().play(&coop, &coop, &mut rng);

        assert_eq!(outcome.turns_played, 10);
        assert_eq!(outcome.normalised_score_a(), 3.0);
        assert_eq!(outcome.normalised_score_b(), 3.0);
        assert_eq!(outcome.states_a.normalised(10).cc, 1.0);
    }

    #[test]
    fn test_tit_for_tat_vs_defector() {
        let mut rng = StdRng::seed_from_u64(1);
        let tft = policy("Tit For Tat");
        let defector = policy("Defector");
        let outcome = fixed_length_match().play(&tft, &defector, &mut rng);

        // TFT is suckered exactly once, then both defect forever
        assert_eq!(outcome.states_a.cd, 1);
        assert_eq!(outcome.states_a.dd, 9);
        assert_eq!(outcome.score_a, 0.0 + 9.0 * 1.0);
        assert_eq!(outcome.score_b, 5.0 + 9.0 * 1.0);
    }

    #[test]
    fn test_mirrored_counts_swap_sucker_states() {
        let counts = StateCounts {
            cc: 3,
            cd: 2,
            dc: 1,
            dd: 4,
        };
        let mirror = counts.mirrored();
        assert_eq!(mirror.cd, 1);
        assert_eq!(mirror.dc, 2);
        assert_eq!(mirror.cc, 3);
        assert_eq!(mirror.dd, 4);
    }

    #[test]
    fn test_same_seed_same_length() {
        let stochastic = IteratedMatch::new(PayoffMatrix::classic(), 30, 0.1);
        let coop = policy("Cooperator");

        let a = stochastic.play(&coop, &coop, &mut StdRng::seed_from_u64(7));
        let b = stochastic.play(&coop, &coop, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.turns_played, b.turns_played);
        assert!(a.turns_played >= 1 && a.turns_played <= 30);
    }
}
