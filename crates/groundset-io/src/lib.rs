//! File formats for groundset.
//!
//! Reads finished word graphs (incoming-adjacency word lists or raw edge
//! lists) and grounding-set files, and writes JSON reports labelled with
//! words where the input had them.

pub mod edge_list;
pub mod error;
pub mod grounding_file;
pub mod incoming;
pub mod input;
pub mod lexicon;
pub mod report;

pub use edge_list::{parse_edge_list, EdgeListFile};
pub use error::IoError;
pub use grounding_file::{read_grounding_file, write_grounding_file, GroundingEntry, GroundingFile};
pub use incoming::{from_incoming_adjacency, parse_incoming_adjacency, IncomingAdjacency};
pub use input::{load_graph, parse_graph, InputFormat, LoadedGraph};
pub use lexicon::Lexicon;
pub use report::{
    write_json, GroundingReport, MandatoryReport, MandatoryRow, StatsReport, TrialsReport,
    VerificationOutput,
};
