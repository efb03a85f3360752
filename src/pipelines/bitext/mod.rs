/*! Bitext cleaning.

Takes two aligned monolingual sources, pairs them up and runs the pair
collection through heuristic filters, optional downsampling and an
optional semantic similarity cutoff before persisting the survivors.
!*/
mod dataset;
mod pipeline;
pub mod types;

pub use dataset::PairDataset;
pub use pipeline::{BitextCleaner, CleanStats, DownsampleParams, FilterParams};
