//! Pipelines.
//!
//! Various pipelines are implemented here, and the module
//! provides a light [pipeline::Pipeline] trait that enables easy and flexible pipeline creation.
pub mod bitext;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod score;

pub use bitext::BitextCleaner;
pub use pipeline::Pipeline;
pub use score::ScoreTranslations;
