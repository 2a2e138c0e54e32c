//! Experiment runner
//!
//! Drives the partition sequence strictly sequentially: each partition is
//! fully aggregated before the next is requested (the generator is a
//! single-pass lazy sequence with no lookahead). System rows are appended
//! in arrival order and never removed or reordered.
//!
//! Checkpoints are write-only safety nets: a snapshot of the table so far
//! is persisted at a fixed cadence so a later fatal error cannot lose
//! everything, but runs are NOT resumable — an interrupted experiment
//! restarts from scratch.

use std::path::PathBuf;

use tracing::{error, info, warn};

use dilemma_common::{DilemmaError, PayoffMatrix, Result};

use crate::evaluate::CooperationNorm;
use crate::partition::Partition;
use crate::persist;
use crate::system::{SystemAggregator, SystemResult};
use crate::universe::Universe;

/// Append-only sequence of system rows plus the run's payoff configuration
#[derive(Debug, Clone)]
pub struct ExperimentTable {
    payoff: PayoffMatrix,
    cooperation_norm: CooperationNorm,
    rows: Vec<SystemResult>,
}

impl ExperimentTable {
    pub fn new(payoff: PayoffMatrix, cooperation_norm: CooperationNorm) -> Self {
        Self {
            payoff,
            cooperation_norm,
            rows: Vec::new(),
        }
    }

    /// Append one system row
    pub fn push(&mut self, row: SystemResult) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[SystemResult] {
        &self.rows
    }

    pub fn payoff(&self) -> &PayoffMatrix {
        &self.payoff
    }

    pub fn cooperation_norm(&self) -> CooperationNorm {
        self.cooperation_norm
    }

    /// Teams per system, taken from the first row
    pub fn team_count(&self) -> usize {
        self.rows.first().map(|r| r.teams.len()).unwrap_or(0)
    }

    /// Render the table to CSV
    pub fn to_csv(&self) -> String {
        persist::table_to_csv(self)
    }
}

/// Sequential experiment driver with periodic checkpointing
pub struct ExperimentRunner {
    aggregator: SystemAggregator,
    out_dir: PathBuf,
    tag: String,
    checkpoint_interval: usize,
    progress_interval: usize,
}

impl ExperimentRunner {
    pub fn new(
        aggregator: SystemAggregator,
        out_dir: impl Into<PathBuf>,
        tag: impl Into<String>,
        checkpoint_interval: usize,
        progress_interval: usize,
    ) -> Self {
        Self {
            aggregator,
            out_dir: out_dir.into(),
            tag: tag.into(),
            checkpoint_interval: checkpoint_interval.max(1),
            progress_interval: progress_interval.max(1),
        }
    }

    /// Consume the partition sequence and build the experiment table
    ///
    /// A system whose evaluation times out is dropped with a warning and
    /// the run continues; any other failure aborts the run after naming
    /// the partition in flight. The final table is persisted after the
    /// sequence is exhausted.
    pub async fn run(
        &self,
        partitions: impl Iterator<Item = Partition>,
        universe: &Universe,
        payoff: &PayoffMatrix,
        total: Option<u128>,
    ) -> Result<ExperimentTable> {
        let mut table = ExperimentTable::new(*payoff, self.aggregator.cooperation_norm());

        for (idx, partition) in partitions.enumerate() {
            let number = idx + 1;

            match self.aggregator.aggregate(&partition, universe, payoff).await {
                Ok(row) => {
                    table.push(row);
                    if table.len() % self.checkpoint_interval == 0 {
                        let path = self.persist(&table)?;
                        info!(rows = table.len(), path = %path.display(), "checkpoint saved");
                    }
                }
                Err(DilemmaError::Engine(e)) if e.is_recoverable() => {
                    warn!(partition = number, error = %e, "dropping system after engine timeout");
                }
                Err(e) => {
                    error!(partition = number, error = %e, "experiment aborted");
                    return Err(e);
                }
            }

            if number % self.progress_interval == 0 {
                match total {
                    Some(total) => info!(
                        processed = number,
                        total,
                        progress = number as f64 / total as f64,
                        "experiment progress"
                    ),
                    None => info!(processed = number, "experiment progress"),
                }
            }
        }

        let path = self.persist(&table)?;
        info!(rows = table.len(), path = %path.display(), "final table saved");
        Ok(table)
    }

    fn persist(&self, table: &ExperimentTable) -> Result<PathBuf> {
        let stem = format!("{}_sys1to{}", self.tag, table.len());
        persist::write_table(table, &self.out_dir, &stem)
    }
}
