/*! Translation scoring.

Scores machine translation hypotheses line-by-line against the target
side of a cleaned pair file.
!*/
mod pipeline;
pub mod types;

pub use pipeline::ScoreTranslations;
pub use types::ScoredPair;
