//! Grounding-set files: `{"grounding_set": [...]}`.
//!
//! Entries are vertex indices or words and may be mixed. Words need a
//! lexicon to resolve.

use std::fs;
use std::path::Path;

use groundset_core::VertexId;
use serde::{Deserialize, Serialize};

use crate::error::IoError;
use crate::lexicon::Lexicon;
use crate::report::write_json;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroundingEntry {
    Index(u64),
    Word(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingFile {
    pub grounding_set: Vec<GroundingEntry>,
}

impl GroundingFile {
    /// Writes words when a lexicon is available, indices otherwise.
    pub fn from_vertices(vertices: &[VertexId], lexicon: Option<&Lexicon>) -> Self {
        let grounding_set = match lexicon {
            Some(lexicon) => lexicon
                .words_for(vertices)
                .into_iter()
                .map(GroundingEntry::Word)
                .collect(),
            None => vertices
                .iter()
                .map(|v| GroundingEntry::Index(u64::from(v.0)))
                .collect(),
        };
        GroundingFile { grounding_set }
    }

    /// Maps every entry to a vertex. Range checking against a graph is left
    /// to the caller.
    pub fn resolve(&self, lexicon: Option<&Lexicon>) -> Result<Vec<VertexId>, IoError> {
        self.grounding_set
            .iter()
            .map(|entry| match entry {
                GroundingEntry::Index(i) => u32::try_from(*i)
                    .map(VertexId)
                    .map_err(|_| IoError::invalid(format!("vertex index {} is too large", i))),
                GroundingEntry::Word(word) => {
                    let lexicon = lexicon.ok_or_else(|| {
                        IoError::invalid(format!(
                            "grounding file names word '{}' but the graph has no words",
                            word
                        ))
                    })?;
                    lexicon
                        .vertex(word)
                        .ok_or_else(|| IoError::invalid(format!("unknown word '{}'", word)))
                }
            })
            .collect()
    }
}

pub fn read_grounding_file(path: impl AsRef<Path>) -> Result<GroundingFile, IoError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn write_grounding_file(path: impl AsRef<Path>, file: &GroundingFile) -> Result<(), IoError> {
    write_json(path, file)
}
