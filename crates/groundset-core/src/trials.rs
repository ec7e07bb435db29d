//! Repeated grounding runs.
//!
//! Trial `i` uses stream `i` of `config.random_seed`, so a summary is
//! reproducible regardless of how rayon schedules the trials. The mandatory
//! set is computed once and shared read-only across workers.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GroundingConfig;
use crate::error::GroundingError;
use crate::graph::GraphStore;
use crate::mandatory::MandatorySet;
use crate::orchestrator::{GroundingOutcome, GroundingRun};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial: usize,
    pub stream: u64,
    pub outcome: GroundingOutcome,
}

/// Size statistics across trials, plus every individual outcome in trial
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trials: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub mean_size: f64,
    pub outcomes: Vec<TrialOutcome>,
}

impl TrialSummary {
    /// The outcome with the smallest grounding set; earliest trial on ties.
    pub fn best(&self) -> Option<&TrialOutcome> {
        self.outcomes
            .iter()
            .min_by_key(|t| (t.outcome.grounding_set_size, t.trial))
    }
}

/// Runs `config.trials` independent grounding runs in parallel.
///
/// Deterministic strategies always produce the same set, so they run once
/// whatever `config.trials` says. A trial count of zero is treated as one.
pub fn run_trials(
    graph: &GraphStore,
    config: &GroundingConfig,
) -> Result<TrialSummary, GroundingError> {
    let requested = config.trials.max(1);
    let trials = if config.strategy.is_deterministic() {
        if requested > 1 {
            warn!(
                strategy = %config.strategy,
                requested,
                "strategy is deterministic, running a single trial"
            );
        }
        1
    } else {
        requested
    };

    let mandatory = MandatorySet::compute(graph);
    info!(
        trials,
        strategy = %config.strategy,
        seed = config.random_seed,
        mandatory = mandatory.len(),
        "starting grounding trials"
    );

    let outcomes = (0..trials)
        .into_par_iter()
        .map(|trial| {
            let stream = trial as u64;
            GroundingRun::with_stream(graph, &mandatory, config, stream)
                .run()
                .map(|outcome| TrialOutcome {
                    trial,
                    stream,
                    outcome,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let sizes = outcomes.iter().map(|t| t.outcome.grounding_set_size);
    let min_size = sizes.clone().min().unwrap_or(0);
    let max_size = sizes.clone().max().unwrap_or(0);
    let mean_size = sizes.sum::<usize>() as f64 / outcomes.len().max(1) as f64;

    Ok(TrialSummary {
        trials,
        min_size,
        max_size,
        mean_size,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strategy;

    fn cycle_forest() -> GraphStore {
        // Three disjoint 3-cycles: every trial needs exactly three seeds.
        let edges = [
            (0, 1),
            (1, 2),
            (2, 0),
            (3, 4),
            (4, 5),
            (5, 3),
            (6, 7),
            (7, 8),
            (8, 6),
        ];
        GraphStore::from_edges(9, &edges).unwrap()
    }

    #[test]
    fn random_trials_are_reproducible() {
        let graph = cycle_forest();
        let config = GroundingConfig {
            strategy: Strategy::Random,
            trials: 6,
            random_seed: 11,
            ..GroundingConfig::default()
        };

        let first = run_trials(&graph, &config).unwrap();
        let second = run_trials(&graph, &config).unwrap();
        assert_eq!(first, second);

        assert_eq!(first.trials, 6);
        assert_eq!(first.outcomes.len(), 6);
        for (i, t) in first.outcomes.iter().enumerate() {
            assert_eq!(t.trial, i);
            assert_eq!(t.stream, i as u64);
        }
        assert_eq!(first.min_size, 3);
        assert_eq!(first.max_size, 3);
        assert!((first.mean_size - 3.0).abs() < 1e-12);
    }

    #[test]
    fn deterministic_strategy_runs_once() {
        let graph = cycle_forest();
        let config = GroundingConfig {
            strategy: Strategy::StaticOutDegree,
            trials: 5,
            ..GroundingConfig::default()
        };
        let summary = run_trials(&graph, &config).unwrap();
        assert_eq!(summary.trials, 1);
        assert_eq!(summary.outcomes.len(), 1);
        assert_eq!(
            summary.best().unwrap().outcome.grounding_set,
            vec![
                crate::id::VertexId(0),
                crate::id::VertexId(3),
                crate::id::VertexId(6)
            ]
        );
    }

    #[test]
    fn zero_trials_still_runs_once() {
        let graph = cycle_forest();
        let config = GroundingConfig {
            strategy: Strategy::Random,
            trials: 0,
            ..GroundingConfig::default()
        };
        assert_eq!(run_trials(&graph, &config).unwrap().trials, 1);
    }
}
