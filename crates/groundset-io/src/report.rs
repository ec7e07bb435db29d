//! JSON reports, optionally labelled with words.

use std::fs;
use std::path::Path;

use groundset_core::{
    GraphSummary, GroundingOutcome, MandatoryReason, MandatorySet, TrialSummary,
    VerificationReport, VertexId,
};
use serde::{Deserialize, Serialize};

use crate::error::IoError;
use crate::lexicon::Lexicon;

/// Writes `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<(), IoError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

fn labels(lexicon: Option<&Lexicon>, vertices: &[VertexId]) -> Option<Vec<String>> {
    lexicon.map(|l| l.words_for(vertices))
}

/// A single run's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingReport {
    #[serde(flatten)]
    pub outcome: GroundingOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_words: Option<Vec<String>>,
}

impl GroundingReport {
    pub fn new(outcome: GroundingOutcome, lexicon: Option<&Lexicon>) -> Self {
        GroundingReport {
            grounding_words: labels(lexicon, &outcome.grounding_set),
            extra_words: labels(lexicon, &outcome.extra_grounding_set),
            outcome,
        }
    }
}

/// Repeated trials, with the smallest set labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialsReport {
    #[serde(flatten)]
    pub summary: TrialSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_trial: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_words: Option<Vec<String>>,
}

impl TrialsReport {
    pub fn new(summary: TrialSummary, lexicon: Option<&Lexicon>) -> Self {
        let best = summary.best();
        let best_trial = best.map(|t| t.trial);
        let best_words = best.and_then(|t| labels(lexicon, &t.outcome.grounding_set));
        TrialsReport {
            summary,
            best_trial,
            best_words,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryRow {
    pub vertex: VertexId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    pub reasons: Vec<MandatoryReason>,
}

/// The mandatory set B with the reason each member is in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryReport {
    pub vertex_count: usize,
    pub mandatory_size: usize,
    pub no_predecessors: usize,
    pub self_loops: usize,
    pub entries: Vec<MandatoryRow>,
}

impl MandatoryReport {
    pub fn new(vertex_count: usize, mandatory: &MandatorySet, lexicon: Option<&Lexicon>) -> Self {
        let entries = mandatory
            .entries()
            .iter()
            .map(|entry| MandatoryRow {
                vertex: entry.vertex,
                word: lexicon.and_then(|l| l.word(entry.vertex)).map(str::to_owned),
                reasons: entry.reasons.clone(),
            })
            .collect();
        MandatoryReport {
            vertex_count,
            mandatory_size: mandatory.len(),
            no_predecessors: mandatory.count_with(MandatoryReason::NoPredecessors),
            self_loops: mandatory.count_with(MandatoryReason::SelfLoop),
            entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutput {
    #[serde(flatten)]
    pub report: VerificationReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_words: Option<Vec<String>>,
}

impl VerificationOutput {
    pub fn new(report: VerificationReport, lexicon: Option<&Lexicon>) -> Self {
        VerificationOutput {
            missing_words: labels(lexicon, &report.missing),
            report,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    #[serde(flatten)]
    pub summary: GraphSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_out_degree_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_in_degree_words: Option<Vec<String>>,
}

impl StatsReport {
    pub fn new(summary: GraphSummary, lexicon: Option<&Lexicon>) -> Self {
        let out: Vec<VertexId> = summary.top_out_degree.iter().map(|e| e.vertex).collect();
        let inc: Vec<VertexId> = summary.top_in_degree.iter().map(|e| e.vertex).collect();
        StatsReport {
            top_out_degree_words: labels(lexicon, &out),
            top_in_degree_words: labels(lexicon, &inc),
            summary,
        }
    }
}
