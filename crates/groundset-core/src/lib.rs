//! Grounding sets of directed word graphs.
//!
//! An edge `u -> v` means `u` appears in the definition of `v`. A grounding
//! set is a set of seed vertices from which every vertex becomes known by
//! propagating along edges. This crate computes the mandatory part of any
//! such set, grows it greedily with a pluggable [`SeedSelector`], and checks
//! candidate sets after the fact.

pub mod config;
pub mod error;
pub mod graph;
pub mod id;
pub mod mandatory;
pub mod orchestrator;
pub mod reachability;
pub mod selector;
pub mod stats;
pub mod trials;
pub mod verify;

// Re-export commonly used types
pub use config::{
    ClosureRule, GraphOptions, GroundingConfig, InitialGrounding, Strategy, WorklistOrder,
};
pub use error::GroundingError;
pub use graph::GraphStore;
pub use id::VertexId;
pub use mandatory::{MandatoryEntry, MandatoryReason, MandatorySet};
pub use orchestrator::{ground, GroundingOutcome, GroundingRun, RunState};
pub use reachability::ReachabilityEngine;
pub use selector::{build_selector, SeedSelector};
pub use stats::{DegreeEntry, GraphSummary};
pub use trials::{run_trials, TrialOutcome, TrialSummary};
pub use verify::{verify_grounding_set, VerificationReport};
