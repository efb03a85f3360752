//! Scoring traits.
use crate::error::Error;

/// Batched pair-similarity scoring.
///
/// Takes two equal-length batches and returns one score per aligned pair,
/// order preserved. Implementations are free to sub-batch internally as
/// long as the output stays index-aligned with the input.
pub trait SimilarityScorer {
    fn score_pairs(&self, sources: &[&str], targets: &[&str]) -> Result<Vec<f32>, Error>;
}

/// Sentence embedding backend.
///
/// `Sync` so a scorer can fan sub-batches out to worker threads over a
/// shared reference.
pub trait SentenceEncoder: Sync {
    /// Encode a batch of sentences: one vector per sentence, in input order.
    fn encode_batch(&self, sentences: &[&str]) -> Result<Vec<Vec<f32>>, Error>;
}
