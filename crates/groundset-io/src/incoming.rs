//! Incoming-adjacency word lists.
//!
//! The document is a JSON object mapping each headword to the words of its
//! definition. A defining word `d` of headword `w` becomes the edge
//! `d -> w`. Headwords take vertex indices in file order; defining words
//! that never appear as headwords follow in first-seen order. A headword
//! with an empty definition list is still a vertex.

use groundset_core::{GraphOptions, GraphStore};
use indexmap::IndexMap;

use crate::error::IoError;
use crate::lexicon::Lexicon;

/// Headword to defining words, in document order.
pub type IncomingAdjacency = IndexMap<String, Vec<String>>;

/// Builds the graph and its lexicon from parsed adjacency lists.
pub fn from_incoming_adjacency(
    adjacency: &IncomingAdjacency,
    options: GraphOptions,
) -> Result<(GraphStore, Lexicon), IoError> {
    let mut lexicon = Lexicon::new();
    for word in adjacency.keys() {
        lexicon.intern(word);
    }

    let mut edges = Vec::with_capacity(adjacency.values().map(Vec::len).sum());
    for (word, defining) in adjacency {
        let target = lexicon.intern(word);
        for d in defining {
            let source = lexicon.intern(d);
            edges.push((source.index(), target.index()));
        }
    }

    let graph = GraphStore::with_options(lexicon.len(), &edges, options)?;
    Ok((graph, lexicon))
}

pub fn parse_incoming_adjacency(
    json: &str,
    options: GraphOptions,
) -> Result<(GraphStore, Lexicon), IoError> {
    let adjacency: IncomingAdjacency = serde_json::from_str(json)?;
    from_incoming_adjacency(&adjacency, options)
}
