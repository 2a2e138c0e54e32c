//! Experiment configuration
//!
//! All run parameters are construction-time configuration: the agent
//! universe, team size, payoff selection, match settings and persistence
//! cadence. Nothing is derived from ambient global state.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use dilemma_common::{MatchSettings, PayoffMatrix};

use crate::evaluate::CooperationNorm;
use crate::partition::AnchorPolicy;

/// Full configuration for one experiment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpConfig {
    /// Catalog names of the agent universe, in universe order
    pub agents: Vec<String>,
    /// Team size k
    pub team_size: usize,
    /// Named payoff configuration: classic, stag or high_t
    pub game: String,
    /// Match settings
    pub match_params: MatchParams,
    /// Persistence settings
    pub persistence: PersistenceSettings,
    /// Anchor seed; unset means the deterministic first-element pivot
    pub anchor_seed: Option<u64>,
    /// Which cooperation normalization feeds the distribution columns
    pub cooperation_norm: CooperationNorm,
    /// Load partitions from this JSON file instead of re-enumerating
    pub partitions_file: Option<PathBuf>,
}

/// Tournament construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchParams {
    /// Cap on turns per iterated match
    pub turns: u32,
    /// Per-round probability that a match ends early
    pub prob_end: f64,
    /// Tournament repetitions per team
    pub repetitions: u32,
    /// Base seed for match randomness
    pub seed: u64,
    /// Per-team engine-call timeout in seconds
    pub team_timeout_secs: u64,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            turns: dilemma_common::DEFAULT_TURNS,
            prob_end: dilemma_common::DEFAULT_PROB_END,
            repetitions: dilemma_common::DEFAULT_REPETITIONS,
            seed: dilemma_common::DEFAULT_SEED,
            team_timeout_secs: crate::DEFAULT_TEAM_TIMEOUT_SECS,
        }
    }
}

/// Output and cadence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceSettings {
    /// Directory checkpoint and final tables land in
    pub out_dir: PathBuf,
    /// Descriptive tag prefixed to every filename
    pub tag: String,
    /// Rows between checkpoint snapshots
    pub checkpoint_interval: usize,
    /// Partitions between progress reports
    pub progress_interval: usize,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("data"),
            tag: "experiment".to_string(),
            checkpoint_interval: crate::CHECKPOINT_INTERVAL,
            progress_interval: crate::PROGRESS_INTERVAL,
        }
    }
}

impl Default for ExpConfig {
    fn default() -> Self {
        Self {
            // the popular four: pure defection plus the three retaliators
            agents: ["Defector", "Grim Trigger", "Suspicious Tit For Tat", "Tit For Tat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            team_size: crate::DEFAULT_TEAM_SIZE,
            game: "classic".to_string(),
            match_params: MatchParams::default(),
            persistence: PersistenceSettings::default(),
            anchor_seed: None,
            cooperation_norm: CooperationNorm::default(),
            partitions_file: None,
        }
    }
}

impl ExpConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        if let Ok(agents) = std::env::var("DILEMMA_AGENTS") {
            cfg.agents = agents
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(val) = std::env::var("DILEMMA_TEAM_SIZE") {
            if let Ok(v) = val.parse() {
                cfg.team_size = v;
            }
        }
        if let Ok(game) = std::env::var("DILEMMA_GAME") {
            cfg.game = game;
        }

        // Match settings
        if let Ok(val) = std::env::var("DILEMMA_TURNS") {
            if let Ok(v) = val.parse() {
                cfg.match_params.turns = v;
            }
        }
        if let Ok(val) = std::env::var("DILEMMA_PROB_END") {
            if let Ok(v) = val.parse() {
                cfg.match_params.prob_end = v;
            }
        }
        if let Ok(val) = std::env::var("DILEMMA_REPETITIONS") {
            if let Ok(v) = val.parse() {
                cfg.match_params.repetitions = v;
            }
        }
        if let Ok(val) = std::env::var("DILEMMA_SEED") {
            if let Ok(v) = val.parse() {
                cfg.match_params.seed = v;
            }
        }
        if let Ok(val) = std::env::var("DILEMMA_TEAM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                cfg.match_params.team_timeout_secs = v;
            }
        }

        // Persistence settings
        if let Ok(val) = std::env::var("DILEMMA_OUT_DIR") {
            cfg.persistence.out_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("DILEMMA_TAG") {
            cfg.persistence.tag = val;
        }
        if let Ok(val) = std::env::var("DILEMMA_CHECKPOINT_INTERVAL") {
            if let Ok(v) = val.parse() {
                cfg.persistence.checkpoint_interval = v;
            }
        }
        if let Ok(val) = std::env::var("DILEMMA_PROGRESS_INTERVAL") {
            if let Ok(v) = val.parse() {
                cfg.persistence.progress_interval = v;
            }
        }

        if let Ok(val) = std::env::var("DILEMMA_ANCHOR_SEED") {
            if let Ok(v) = val.parse() {
                cfg.anchor_seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("DILEMMA_CC_NORM") {
            match val.as_str() {
                "per-opponent" => cfg.cooperation_norm = CooperationNorm::PerOpponent,
                "per-pair" => cfg.cooperation_norm = CooperationNorm::PerPair,
                _ => {}
            }
        }
        if let Ok(val) = std::env::var("DILEMMA_PARTITIONS_FILE") {
            cfg.partitions_file = Some(PathBuf::from(val));
        }

        Ok(cfg)
    }

    /// Resolve the named payoff configuration
    pub fn payoff(&self) -> dilemma_common::Result<PayoffMatrix> {
        PayoffMatrix::by_name(&self.game)
            .ok_or_else(|| dilemma_common::DilemmaError::Config(format!("unknown game: {}", self.game)))
    }

    /// Match settings in the engine's shape
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            turns: self.match_params.turns,
            prob_end: self.match_params.prob_end,
            repetitions: self.match_params.repetitions,
            seed: self.match_params.seed,
        }
    }

    /// Anchor policy for the partition generator
    pub fn anchor_policy(&self) -> AnchorPolicy {
        match self.anchor_seed {
            Some(seed) => AnchorPolicy::Seeded(seed),
            None => AnchorPolicy::First,
        }
    }

    /// Per-team engine-call timeout
    pub fn team_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.match_params.team_timeout_secs)
    }
}
