//! Automatic translation metrics.
use crate::error::Error;

/// Sentence-level scores produced by a [MetricSuite].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceScores {
    pub bleu: f64,
    pub chrf: f64,
    pub ter: f64,
    pub bert_score_f1: f64,
}

/// Black-box sentence metrics (BLEU, chrF, TER and a BERT-based F1).
///
/// Implementations wrap external scorers; the scoring pipeline only needs
/// this one method, so tests run against deterministic stubs.
pub trait MetricSuite {
    fn sentence_scores(&self, hypothesis: &str, reference: &str) -> Result<SentenceScores, Error>;
}
