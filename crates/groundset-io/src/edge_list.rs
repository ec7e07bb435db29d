//! Raw edge lists: `{"vertex_count": n, "edges": [[u, v], ...]}`.

use groundset_core::{GraphOptions, GraphStore, GroundingError};
use serde::{Deserialize, Serialize};

use crate::error::IoError;

/// The on-disk shape. Signed so negative values are reported as an invalid
/// graph instead of as a generic parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeListFile {
    pub vertex_count: i64,
    #[serde(default)]
    pub edges: Vec<[i64; 2]>,
}

impl EdgeListFile {
    pub fn to_graph(&self, options: GraphOptions) -> Result<GraphStore, IoError> {
        let vertex_count =
            usize::try_from(self.vertex_count).map_err(|_| GroundingError::InvalidGraph {
                reason: format!("negative vertex count {}", self.vertex_count),
            })?;

        let edges = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, &[u, v])| match (usize::try_from(u), usize::try_from(v)) {
                (Ok(u), Ok(v)) => Ok((u, v)),
                _ => Err(GroundingError::InvalidGraph {
                    reason: format!("edge {} has a negative endpoint: [{}, {}]", i, u, v),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GraphStore::with_options(vertex_count, &edges, options)?)
    }
}

pub fn parse_edge_list(json: &str, options: GraphOptions) -> Result<GraphStore, IoError> {
    let file: EdgeListFile = serde_json::from_str(json)?;
    file.to_graph(options)
}
