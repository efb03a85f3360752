/*! Similarity scoring and translation metrics

Holds the [SimilarityScorer] capability the filtering pipeline consumes,
with [SemanticScorer] as its shipped implementation: any
[SentenceEncoder] backend plus a diagonal cosine. The provided backend is
[fasttext](https://fasttext.cc) sentence vectors.

[MetricSuite] models the sentence-level automatic metrics used by the
translation scoring pipeline.
!*/
mod fasttext;
mod metrics;
mod scorer;
mod semantic;

pub use fasttext::FastTextEncoder;
pub use metrics::{MetricSuite, SentenceScores};
pub use scorer::{SentenceEncoder, SimilarityScorer};
pub use semantic::SemanticScorer;
pub use semantic::DEFAULT_BATCH_SIZE;
