/*! Cleaning pipeline.

[BitextCleaner] wires the whole run together: open the two sources,
pair them, filter, optionally downsample, optionally cut on semantic
similarity and persist the survivors as JSONL.

Stages always run in the same order; [FilterParams] only switches
individual filters off or changes their thresholds.
!*/
use std::path::PathBuf;

use log::{info, warn};

use super::dataset::PairDataset;
use super::types::SizeSpec;
use crate::error::Error;
use crate::filtering::pair;
use crate::io::reader::source::SourceSpec;
use crate::pipelines::pipeline::Pipeline;
use crate::scoring::SimilarityScorer;

/// Per-stage filter switches and thresholds.
///
/// A `None` (or `false`) skips the stage entirely. The default enables
/// every stage at the filter defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub identical: bool,
    pub urls: bool,
    pub max_ratio: Option<f64>,
    pub token_bounds: Option<(usize, usize)>,
    pub min_chars: Option<usize>,
    pub max_token_diff: Option<usize>,
    pub max_common_ratio: Option<f64>,
}

impl FilterParams {
    /// Every stage disabled. Useful as a base when only a couple of
    /// filters are wanted.
    pub fn none() -> Self {
        Self {
            identical: false,
            urls: false,
            max_ratio: None,
            token_bounds: None,
            min_chars: None,
            max_token_diff: None,
            max_common_ratio: None,
        }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        let ratio = pair::EditRatio::default();
        let tokens = pair::TokenCount::default();
        let chars = pair::CharCount::default();
        let diff = pair::TokenDiff::default();
        let prefix = pair::CommonPrefix::default();
        Self {
            identical: true,
            urls: true,
            max_ratio: Some(*ratio.max()),
            token_bounds: Some((*tokens.min(), *tokens.max())),
            min_chars: Some(*chars.min()),
            max_token_diff: Some(*diff.max()),
            max_common_ratio: Some(*prefix.max_ratio()),
        }
    }
}

/// Downsampling stage settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownsampleParams {
    pub spec: SizeSpec,
    pub randomize: bool,
    pub seed: Option<u64>,
}

impl DownsampleParams {
    /// Randomized, entropy-seeded sampling to the given size.
    pub fn new(spec: SizeSpec) -> Self {
        Self {
            spec,
            randomize: true,
            seed: None,
        }
    }

    /// Randomized sampling with a fixed seed, for reproducible runs.
    pub fn seeded(spec: SizeSpec, seed: u64) -> Self {
        Self {
            spec,
            randomize: true,
            seed: Some(seed),
        }
    }
}

/// Counters reported by a finished cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanStats {
    pub pairs_read: usize,
    pub pairs_written: usize,
}

/// End-to-end cleaning run over two aligned sources.
pub struct BitextCleaner {
    source: SourceSpec,
    target: SourceSpec,
    source_label: String,
    target_label: String,
    dst: PathBuf,
    filters: FilterParams,
    downsample: Option<DownsampleParams>,
    cutoff: Option<f32>,
    scorer: Option<Box<dyn SimilarityScorer>>,
}

impl BitextCleaner {
    /// A cleaner with default filters and no downsampling or similarity
    /// cutoff.
    pub fn new(
        source: SourceSpec,
        target: SourceSpec,
        source_label: &str,
        target_label: &str,
        dst: PathBuf,
    ) -> Self {
        Self {
            source,
            target,
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            dst,
            filters: FilterParams::default(),
            downsample: None,
            cutoff: None,
            scorer: None,
        }
    }

    pub fn with_filters(mut self, filters: FilterParams) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_downsample(mut self, params: DownsampleParams) -> Self {
        self.downsample = Some(params);
        self
    }

    /// Keep only pairs scoring strictly above `threshold`.
    /// Requires a scorer to be set before the run.
    pub fn with_cutoff(mut self, threshold: f32) -> Self {
        self.cutoff = Some(threshold);
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    fn check_config(&self) -> Result<(), Error> {
        if self.source_label.is_empty() || self.target_label.is_empty() {
            return Err(Error::Custom("pair labels must be non-empty".to_string()));
        }
        if self.source_label == self.target_label {
            return Err(Error::Custom(format!(
                "pair labels must differ, got {:?} twice",
                self.source_label
            )));
        }
        if self.cutoff.is_some() && self.scorer.is_none() {
            return Err(Error::Custom(
                "similarity cutoff requires a scorer".to_string(),
            ));
        }
        Ok(())
    }
}

impl Pipeline<CleanStats> for BitextCleaner {
    fn run(&self) -> Result<CleanStats, Error> {
        self.check_config()?;

        info!(
            "pairing {} from {:?} with {} from {:?}",
            self.source_label,
            self.source.path(),
            self.target_label,
            self.target.path()
        );
        let sources = self.source.open()?;
        let targets = self.target.open()?;
        let mut dataset =
            PairDataset::from_sources(&self.source_label, &self.target_label, sources, targets)?;
        let pairs_read = dataset.len();
        info!("paired {} lines", pairs_read);

        let filters = &self.filters;
        if filters.identical {
            dataset.filter_identical();
        }
        if filters.urls {
            dataset.filter_urls();
        }
        if let Some(max_ratio) = filters.max_ratio {
            dataset.filter_by_ratio(max_ratio);
        }
        if let Some((min, max)) = filters.token_bounds {
            dataset.filter_by_tokens(min, max);
        }
        if let Some(min_chars) = filters.min_chars {
            dataset.filter_by_char_len(min_chars);
        }
        if let Some(max_diff) = filters.max_token_diff {
            dataset.filter_by_n_token_diff(max_diff);
        }
        if let Some(max_common) = filters.max_common_ratio {
            dataset.filter_by_common_ratio(max_common);
        }
        info!("{} pairs left after filtering", dataset.len());

        if dataset.is_empty() {
            warn!("no pairs survived filtering");
        } else {
            if let Some(params) = &self.downsample {
                dataset.downsample(params.spec, params.randomize, params.seed)?;
            }
            if let Some(threshold) = self.cutoff {
                if let Some(scorer) = &self.scorer {
                    dataset.similarity_cutoff(threshold, scorer.as_ref())?;
                }
            }
        }

        let pairs_written = dataset.write_to_file(&self.dst)?;
        Ok(CleanStats {
            pairs_read,
            pairs_written,
        })
    }
}
