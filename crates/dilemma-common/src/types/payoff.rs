//! PayoffMatrix - stage game payoff configuration
//!
//! The four scalar payoffs of the symmetric two-player stage game:
//! R (mutual cooperation), P (mutual defection), S (sucker), T (temptation).
//! Every simulation call in a run is parameterized by one of these, and the
//! active values are embedded in every output filename.

use serde::{Deserialize, Serialize};

/// Payoff configuration for the two-player stage game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffMatrix {
    /// Reward for mutual cooperation
    pub r: f64,
    /// Punishment for mutual defection
    pub p: f64,
    /// Sucker's payoff (cooperate against a defector)
    pub s: f64,
    /// Temptation payoff (defect against a cooperator)
    pub t: f64,
}

impl Default for PayoffMatrix {
    fn default() -> Self {
        Self::classic()
    }
}

impl PayoffMatrix {
    /// The classic prisoner's dilemma configuration (R=3, P=1, S=0, T=5)
    pub fn classic() -> Self {
        Self {
            r: 3.0,
            p: 1.0,
            s: 0.0,
            t: 5.0,
        }
    }

    /// Stag-hunt configuration (R=5, P=1, S=0, T=3)
    pub fn stag_hunt() -> Self {
        Self {
            r: 5.0,
            p: 1.0,
            s: 0.0,
            t: 3.0,
        }
    }

    /// High-temptation configuration (R=3, P=1, S=0, T=7)
    pub fn high_temptation() -> Self {
        Self {
            r: 3.0,
            p: 1.0,
            s: 0.0,
            t: 7.0,
        }
    }

    /// Look up a named configuration
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "stag" => Some(Self::stag_hunt()),
            "high_t" => Some(Self::high_temptation()),
            _ => None,
        }
    }

    /// The payoff values in (R, P, S, T) order
    pub fn rpst(&self) -> (f64, f64, f64, f64) {
        (self.r, self.p, self.s, self.t)
    }

    /// Score one round given both players' actions
    ///
    /// Returns (first player's payoff, second player's payoff).
    pub fn score(&self, mine: super::Action, theirs: super::Action) -> (f64, f64) {
        use super::Action::{Cooperate, Defect};
        match (mine, theirs) {
            (Cooperate, Cooperate) => (self.r, self.r),
            (Defect, Defect) => (self.p, self.p),
            (Cooperate, Defect) => (self.s, self.t),
            (Defect, Cooperate) => (self.t, self.s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    #[test]
    fn test_classic_is_default() {
        assert_eq!(PayoffMatrix::default(), PayoffMatrix::classic());
        assert_eq!(PayoffMatrix::classic().rpst(), (3.0, 1.0, 0.0, 5.0));
    }

    #[test]
    fn test_named_lookup() {
        assert_eq!(
            PayoffMatrix::by_name("stag"),
            Some(PayoffMatrix::stag_hunt())
        );
        assert_eq!(
            PayoffMatrix::by_name("high_t"),
            Some(PayoffMatrix::high_temptation())
        );
        assert_eq!(PayoffMatrix::by_name("nope"), None);
    }

    #[test]
    fn test_score_is_symmetric_on_matching_moves() {
        let g = PayoffMatrix::classic();
        assert_eq!(g.score(Action::Cooperate, Action::Cooperate), (3.0, 3.0));
        assert_eq!(g.score(Action::Defect, Action::Defect), (1.0, 1.0));
        assert_eq!(g.score(Action::Cooperate, Action::Defect), (0.0, 5.0));
        assert_eq!(g.score(Action::Defect, Action::Cooperate), (5.0, 0.0));
    }
}
