/*! Embedding-based pair similarity.

Encodes both sides of each sub-batch with a [SentenceEncoder] and scores
the diagonal only: the cosine of each aligned pair, never a full pairwise
matrix, keeping the cost linear in batch size. Sub-batches are independent
and scored on the rayon pool; results are concatenated in input order.
!*/
use itertools::izip;
use rayon::prelude::*;

use super::{SentenceEncoder, SimilarityScorer};
use crate::error::Error;

pub const DEFAULT_BATCH_SIZE: usize = 128;

pub struct SemanticScorer<E> {
    encoder: E,
    batch_size: usize,
}

impl<E> SemanticScorer<E>
where
    E: SentenceEncoder,
{
    /// Scorer with the default sub-batch size of [DEFAULT_BATCH_SIZE].
    pub fn new(encoder: E) -> Self {
        Self::with_batch_size(encoder, DEFAULT_BATCH_SIZE)
    }

    /// `batch_size` caps how many sentences hit the encoder at once.
    /// A zero batch size is bumped to one.
    pub fn with_batch_size(encoder: E, batch_size: usize) -> Self {
        Self {
            encoder,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> &usize {
        &self.batch_size
    }

    fn score_batch(&self, sources: &[&str], targets: &[&str]) -> Result<Vec<f32>, Error> {
        let source_vecs = self.encoder.encode_batch(sources)?;
        let target_vecs = self.encoder.encode_batch(targets)?;
        if source_vecs.len() != sources.len() {
            return Err(Error::BatchMismatch(sources.len(), source_vecs.len()));
        }
        if target_vecs.len() != targets.len() {
            return Err(Error::BatchMismatch(targets.len(), target_vecs.len()));
        }

        Ok(izip!(&source_vecs, &target_vecs)
            .map(|(s, t)| cosine(s, t))
            .collect())
    }
}

impl<E> SimilarityScorer for SemanticScorer<E>
where
    E: SentenceEncoder,
{
    fn score_pairs(&self, sources: &[&str], targets: &[&str]) -> Result<Vec<f32>, Error> {
        if sources.len() != targets.len() {
            return Err(Error::BatchMismatch(sources.len(), targets.len()));
        }
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let batches: Vec<Vec<f32>> = sources
            .par_chunks(self.batch_size)
            .zip(targets.par_chunks(self.batch_size))
            .map(|(src, tgt)| self.score_batch(src, tgt))
            .collect::<Result<_, _>>()?;

        Ok(batches.into_iter().flatten().collect())
    }
}

/// Cosine of one aligned pair. Zero vectors score 0.
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Maps a few known sentences to fixed two-dimensional vectors.
    struct StubEncoder;

    impl SentenceEncoder for StubEncoder {
        fn encode_batch(&self, sentences: &[&str]) -> Result<Vec<Vec<f32>>, Error> {
            Ok(sentences
                .iter()
                .map(|s| match *s {
                    "east" => vec![1.0, 0.0],
                    "north" => vec![0.0, 1.0],
                    "diagonal" => vec![1.0, 1.0],
                    "origin" => vec![0.0, 0.0],
                    other => vec![other.len() as f32, 1.0],
                })
                .collect())
        }
    }

    #[test]
    fn scores_the_diagonal() {
        let scorer = SemanticScorer::new(StubEncoder);
        let scores = scorer
            .score_pairs(&["east", "east"], &["east", "north"])
            .unwrap();
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 1.0).abs() < 1e-6);
        assert!(scores[1].abs() < 1e-6);
    }

    #[test]
    fn cosine_of_half_turned_vectors() {
        let scorer = SemanticScorer::new(StubEncoder);
        let scores = scorer.score_pairs(&["east"], &["diagonal"]).unwrap();
        let expected = 1.0 / 2.0_f32.sqrt();
        assert!((scores[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_vectors_score_zero() {
        let scorer = SemanticScorer::new(StubEncoder);
        let scores = scorer.score_pairs(&["origin"], &["east"]).unwrap();
        assert_eq!(scores[0], 0.0);
    }

    #[test]
    fn mismatched_batches_are_rejected() {
        let scorer = SemanticScorer::new(StubEncoder);
        assert!(matches!(
            scorer.score_pairs(&["east", "north"], &["east"]),
            Err(Error::BatchMismatch(2, 1))
        ));
    }

    #[test]
    fn empty_batches_yield_no_scores() {
        let scorer = SemanticScorer::new(StubEncoder);
        assert!(scorer.score_pairs(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn sub_batch_size_does_not_change_scores() {
        let sources: Vec<&str> = vec!["east", "north", "diagonal", "east", "north", "word", "w"];
        let targets: Vec<&str> = vec!["north", "north", "east", "diagonal", "east", "w", "word"];

        let small = SemanticScorer::with_batch_size(StubEncoder, 2)
            .score_pairs(&sources, &targets)
            .unwrap();
        let large = SemanticScorer::with_batch_size(StubEncoder, 1000)
            .score_pairs(&sources, &targets)
            .unwrap();

        assert_eq!(small, large);
        assert_eq!(small.len(), sources.len());
    }

    #[test]
    fn order_is_preserved_at_batch_size_one() {
        let scorer = SemanticScorer::with_batch_size(StubEncoder, 1);
        let scores = scorer
            .score_pairs(&["east", "north"], &["east", "east"])
            .unwrap();
        assert!((scores[0] - 1.0).abs() < 1e-6);
        assert!(scores[1].abs() < 1e-6);
    }
}
