//! Run configuration.
//!
//! [`GroundingConfig`] collects every recognised option of a grounding run.
//! It deserializes from JSON (missing fields take their defaults) and every
//! enum parses from the same kebab-case names it serializes to, so the CLI
//! can accept them as plain flag values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the seed set starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitialGrounding {
    /// Start from the mandatory set B.
    #[default]
    Mandatory,
    /// Start from the empty set.
    Empty,
}

/// Seed-selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Uniformly random unknown vertex.
    Random,
    /// Highest precomputed out-degree among unknown vertices.
    StaticOutDegree,
    /// Highest live count of unknown successors.
    #[default]
    DynamicUnknownSuccessor,
}

impl Strategy {
    /// Greedy strategies produce the same grounding set on every run.
    pub fn is_deterministic(self) -> bool {
        !matches!(self, Strategy::Random)
    }
}

/// Drain order of the propagation worklist. Only the traversal order
/// changes; the resulting known set is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorklistOrder {
    /// Queue (breadth-first).
    #[default]
    Fifo,
    /// Stack (depth-first).
    Lifo,
}

/// When an unknown vertex becomes known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClosureRule {
    /// As soon as any predecessor is known (forward reachability).
    #[default]
    AnyPredecessor,
    /// Only once every predecessor is known (a word is learnable when all the
    /// words of its definition are).
    AllPredecessors,
}

/// Options applied while building a [`GraphStore`](crate::graph::GraphStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Collapse parallel edges before degree tables are built. Off by
    /// default: degrees reflect the graph exactly as loaded.
    pub dedup_edges: bool,
}

/// Configuration for a grounding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingConfig {
    pub initial_grounding: InitialGrounding,
    pub strategy: Strategy,
    /// Independent repetitions; only meaningful for [`Strategy::Random`].
    pub trials: usize,
    /// Seed of the random selector's PRNG.
    pub random_seed: u64,
    pub worklist: WorklistOrder,
    pub closure: ClosureRule,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        GroundingConfig {
            initial_grounding: InitialGrounding::default(),
            strategy: Strategy::default(),
            trials: 1,
            random_seed: 42,
            worklist: WorklistOrder::default(),
            closure: ClosureRule::default(),
        }
    }
}

impl GroundingConfig {
    /// Parses a JSON configuration document. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// FromStr / Display use the serde names; `_` is accepted in place of `-`.

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('_', "-")
}

impl FromStr for InitialGrounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "mandatory" => Ok(InitialGrounding::Mandatory),
            "empty" => Ok(InitialGrounding::Empty),
            other => Err(format!(
                "invalid initial grounding '{}', expected mandatory/empty",
                other
            )),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "random" => Ok(Strategy::Random),
            "static-out-degree" | "max-out-degree" => Ok(Strategy::StaticOutDegree),
            "dynamic-unknown-successor" | "dynamic" => Ok(Strategy::DynamicUnknownSuccessor),
            other => Err(format!(
                "invalid strategy '{}', expected random/static-out-degree/dynamic-unknown-successor",
                other
            )),
        }
    }
}

impl FromStr for WorklistOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fifo" | "queue" => Ok(WorklistOrder::Fifo),
            "lifo" | "stack" => Ok(WorklistOrder::Lifo),
            other => Err(format!("invalid worklist order '{}', expected fifo/lifo", other)),
        }
    }
}

impl FromStr for ClosureRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "any-predecessor" | "reachability" => Ok(ClosureRule::AnyPredecessor),
            "all-predecessors" | "definitional" => Ok(ClosureRule::AllPredecessors),
            other => Err(format!(
                "invalid closure rule '{}', expected any-predecessor/all-predecessors",
                other
            )),
        }
    }
}

impl fmt::Display for InitialGrounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InitialGrounding::Mandatory => "mandatory",
            InitialGrounding::Empty => "empty",
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Random => "random",
            Strategy::StaticOutDegree => "static-out-degree",
            Strategy::DynamicUnknownSuccessor => "dynamic-unknown-successor",
        })
    }
}

impl fmt::Display for WorklistOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorklistOrder::Fifo => "fifo",
            WorklistOrder::Lifo => "lifo",
        })
    }
}

impl fmt::Display for ClosureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClosureRule::AnyPredecessor => "any-predecessor",
            ClosureRule::AllPredecessors => "all-predecessors",
        })
    }
}
