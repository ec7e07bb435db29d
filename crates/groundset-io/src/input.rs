//! Loading a finished graph from disk.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use groundset_core::{GraphOptions, GraphStore};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::edge_list::parse_edge_list;
use crate::error::IoError;
use crate::incoming::parse_incoming_adjacency;
use crate::lexicon::Lexicon;

/// On-disk graph encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// Headword to defining-words object.
    #[default]
    Incoming,
    /// Vertex count plus index pairs.
    Edges,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incoming" | "incoming-adjacency" | "words" => Ok(InputFormat::Incoming),
            "edges" | "edge-list" => Ok(InputFormat::Edges),
            other => Err(format!(
                "invalid input format '{}', expected incoming/edges",
                other
            )),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputFormat::Incoming => "incoming",
            InputFormat::Edges => "edges",
        })
    }
}

/// A loaded graph. Only word-based formats carry a lexicon.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: GraphStore,
    pub lexicon: Option<Lexicon>,
}

impl LoadedGraph {
    /// Labels for `vertices`, when the graph has words.
    pub fn words_for(&self, vertices: &[groundset_core::VertexId]) -> Option<Vec<String>> {
        self.lexicon.as_ref().map(|l| l.words_for(vertices))
    }
}

pub fn parse_graph(
    json: &str,
    format: InputFormat,
    options: GraphOptions,
) -> Result<LoadedGraph, IoError> {
    match format {
        InputFormat::Incoming => {
            let (graph, lexicon) = parse_incoming_adjacency(json, options)?;
            Ok(LoadedGraph {
                graph,
                lexicon: Some(lexicon),
            })
        }
        InputFormat::Edges => Ok(LoadedGraph {
            graph: parse_edge_list(json, options)?,
            lexicon: None,
        }),
    }
}

/// Reads and parses the graph at `path`.
pub fn load_graph(
    path: impl AsRef<Path>,
    format: InputFormat,
    options: GraphOptions,
) -> Result<LoadedGraph, IoError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let loaded = parse_graph(&json, format, options)?;
    info!(
        path = %path.display(),
        %format,
        vertices = loaded.graph.vertex_count(),
        edges = loaded.graph.edge_count(),
        dedup_edges = options.dedup_edges,
        "loaded graph"
    );
    Ok(loaded)
}
