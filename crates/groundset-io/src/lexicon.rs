//! Vertex index to word table.

use groundset_core::VertexId;
use indexmap::IndexSet;

/// Words in vertex order: the word at position `i` labels vertex `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    words: IndexSet<String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the vertex for `word`, assigning the next index if unseen.
    pub fn intern(&mut self, word: &str) -> VertexId {
        if let Some(index) = self.words.get_index_of(word) {
            return VertexId(index as u32);
        }
        let (index, _) = self.words.insert_full(word.to_owned());
        VertexId(index as u32)
    }

    pub fn vertex(&self, word: &str) -> Option<VertexId> {
        self.words.get_index_of(word).map(|i| VertexId(i as u32))
    }

    pub fn word(&self, v: VertexId) -> Option<&str> {
        self.words.get_index(v.index()).map(String::as_str)
    }

    /// Labels for `vertices`; a vertex without a word is shown by its index.
    pub fn words_for(&self, vertices: &[VertexId]) -> Vec<String> {
        vertices
            .iter()
            .map(|&v| self.word(v).map_or_else(|| v.to_string(), str::to_owned))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
