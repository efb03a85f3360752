/*! Filtering utilities

Filters operate on pair level: the filter pipeline feeds every
[PairRecord][crate::pipelines::bitext::types::PairRecord] of its current
collection to a filter and keeps the records whose [Filter::detect]
returns `true`.

All shipped filters are stateless and cheap to construct, so the pipeline
builds them per stage from the caller's thresholds.
!*/
mod filter;
pub mod pair;

pub use filter::Filter;
