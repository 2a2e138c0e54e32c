//! Dilemma experiment binary
//!
//! Enumerates every k-partition of the configured agent universe, runs a
//! round-robin tournament per team and writes checkpointed CSV tables.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dilemma_engine::RoundRobinEngine;
use dilemma_exp::{
    partition_count, persist, ExpConfig, ExperimentRunner, IdentityCodec, Partitions,
    SystemAggregator, TeamEvaluator, Universe, EXP_VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting dilemma-exp v{}", EXP_VERSION);

    // Load configuration
    let config = ExpConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let payoff = config.payoff()?;
    let universe = Universe::from_catalog(&config.agents)?;
    let codec = IdentityCodec::new(&universe);

    info!(
        agents = universe.len(),
        team_size = config.team_size,
        game = %config.game,
        "universe constructed"
    );

    let evaluator = TeamEvaluator::new(
        Arc::new(RoundRobinEngine::new()),
        config.match_settings(),
        config.team_timeout(),
    );
    let aggregator = SystemAggregator::new(evaluator, codec, config.cooperation_norm);
    let runner = ExperimentRunner::new(
        aggregator,
        config.persistence.out_dir.clone(),
        config.persistence.tag.clone(),
        config.persistence.checkpoint_interval,
        config.persistence.progress_interval,
    );

    // Either re-enumerate or replay a pre-serialized partition list
    let table = match &config.partitions_file {
        Some(path) => {
            let partitions = persist::load_partitions(path)?;
            let total = partitions.len() as u128;
            info!(total, path = %path.display(), "loaded pre-serialized partitions");
            runner
                .run(partitions.into_iter(), &universe, &payoff, Some(total))
                .await?
        }
        None => {
            let total = partition_count(universe.len(), config.team_size)?;
            info!(total, "enumerating partitions");
            let partitions =
                Partitions::new(universe.names(), config.team_size, config.anchor_policy())?;
            runner
                .run(partitions, &universe, &payoff, Some(total))
                .await?
        }
    };

    info!(rows = table.len(), "experiment complete");
    Ok(())
}
