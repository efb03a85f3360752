/*! Pair filtering and sampling.

[PairDataset] owns the ordered collection of [PairRecord]s flowing through
a cleaning run. Filter stages shrink the collection in place and keep the
surviving records in their original relative order; none of them ever
rewrites a surviving record's text.

Similarity scoring is lazy: [PairDataset::similarity_cutoff] triggers one
batched scorer pass over the whole current collection unless a pass
already ran, and scores are cached on the records until the collection
changes.
!*/
use std::path::Path;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{PairRecord, SizeSpec};
use crate::error::Error;
use crate::filtering::pair;
use crate::filtering::Filter;
use crate::io::writer::JsonlWriter;
use crate::scoring::SimilarityScorer;

pub struct PairDataset {
    source_label: String,
    target_label: String,
    records: Vec<PairRecord>,
    next_position: u64,
    scored: bool,
}

impl PairDataset {
    /// Empty dataset for the two given sides.
    /// Labels name the record fields in the persisted output and are
    /// expected to be non-empty and distinct.
    pub fn new(source_label: &str, target_label: &str) -> Self {
        Self {
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            records: Vec::new(),
            next_position: 0,
            scored: false,
        }
    }

    /// Build a dataset by zipping two sources by position.
    pub fn from_sources<I, J>(
        source_label: &str,
        target_label: &str,
        sources: I,
        targets: J,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Result<String, Error>>,
        J: IntoIterator<Item = Result<String, Error>>,
    {
        let mut dataset = Self::new(source_label, target_label);
        dataset.ingest(sources, targets)?;
        Ok(dataset)
    }

    /// Append pairs from two aligned sources.
    /// Pairing stops at the shorter source; item errors abort the read.
    pub fn ingest<I, J>(&mut self, sources: I, targets: J) -> Result<usize, Error>
    where
        I: IntoIterator<Item = Result<String, Error>>,
        J: IntoIterator<Item = Result<String, Error>>,
    {
        let mut added = 0;
        for (source, target) in sources.into_iter().zip(targets) {
            self.add_record(source?, target?);
            added += 1;
        }
        debug!("ingest: added {} pairs, {} total", added, self.records.len());
        Ok(added)
    }

    /// Append one freshly created record.
    /// The collection loses its scored status: the new member has no
    /// similarity score yet.
    pub fn add_record(&mut self, source_text: String, target_text: String) {
        let record = PairRecord::new(
            self.next_position,
            &self.source_label,
            &self.target_label,
            source_text,
            target_text,
        );
        self.next_position += 1;
        self.records.push(record);
        self.scored = false;
    }

    /// Drop all records. Creation positions are not reused, so records
    /// added afterwards still get fresh identifiers.
    pub fn reset(&mut self) {
        self.records.clear();
        self.scored = false;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PairRecord] {
        &self.records
    }

    /// `true` when every record carries a similarity score from the last
    /// evaluation pass.
    pub fn is_scored(&self) -> bool {
        self.scored
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    /// Run any pair filter over the collection, keeping the records it
    /// detects. Returns the number of records removed.
    pub fn apply<F>(&mut self, filter: &F) -> usize
    where
        F: for<'a> Filter<&'a PairRecord>,
    {
        let before = self.records.len();
        self.records.retain(|record| filter.detect(record));
        before - self.records.len()
    }

    /// Drop pairs whose two sides are exactly equal.
    pub fn filter_identical(&mut self) {
        let removed = self.apply(&pair::Identity);
        debug!(
            "filter_identical: removed {} pairs, {} left",
            removed,
            self.records.len()
        );
    }

    /// Drop pairs whose fuzzy ratio is at or above `max_ratio`.
    pub fn filter_by_ratio(&mut self, max_ratio: f64) {
        let removed = self.apply(&pair::EditRatio::with_max(max_ratio));
        debug!(
            "filter_by_ratio({}): removed {} pairs, {} left",
            max_ratio,
            removed,
            self.records.len()
        );
    }

    /// Keep pairs whose token counts lie strictly between the bounds on
    /// both sides.
    pub fn filter_by_tokens(&mut self, min_tokens: usize, max_tokens: usize) {
        let removed = self.apply(&pair::TokenCount::with_bounds(min_tokens, max_tokens));
        debug!(
            "filter_by_tokens({}, {}): removed {} pairs, {} left",
            min_tokens,
            max_tokens,
            removed,
            self.records.len()
        );
    }

    /// Keep pairs whose character counts strictly exceed `min_chars` on
    /// both sides.
    pub fn filter_by_char_len(&mut self, min_chars: usize) {
        let removed = self.apply(&pair::CharCount::with_min(min_chars));
        debug!(
            "filter_by_char_len({}): removed {} pairs, {} left",
            min_chars,
            removed,
            self.records.len()
        );
    }

    /// Keep pairs whose absolute token-count difference is strictly below
    /// `max_diff`.
    pub fn filter_by_n_token_diff(&mut self, max_diff: usize) {
        let removed = self.apply(&pair::TokenDiff::with_max(max_diff));
        debug!(
            "filter_by_n_token_diff({}): removed {} pairs, {} left",
            max_diff,
            removed,
            self.records.len()
        );
    }

    /// Keep pairs whose common-prefix ratio is strictly below `max_ratio`.
    pub fn filter_by_common_ratio(&mut self, max_ratio: f64) {
        let removed = self.apply(&pair::CommonPrefix::with_max_ratio(max_ratio));
        debug!(
            "filter_by_common_ratio({}): removed {} pairs, {} left",
            max_ratio,
            removed,
            self.records.len()
        );
    }

    /// Keep pairs where neither side contains a URL.
    pub fn filter_urls(&mut self) {
        let removed = self.apply(&pair::UrlFree);
        debug!(
            "filter_urls: removed {} pairs, {} left",
            removed,
            self.records.len()
        );
    }

    /// Score every current pair in one batched scorer pass and cache the
    /// scores on the records. A repeat call re-scores the whole current
    /// collection.
    pub fn evaluate_pairwise_similarity<S>(&mut self, scorer: &S) -> Result<(), Error>
    where
        S: SimilarityScorer + ?Sized,
    {
        let sources: Vec<&str> = self.records.iter().map(|r| r.source_text()).collect();
        let targets: Vec<&str> = self.records.iter().map(|r| r.target_text()).collect();
        debug_assert_eq!(sources.len(), targets.len());

        let scores = scorer.score_pairs(&sources, &targets)?;
        if scores.len() != self.records.len() {
            return Err(Error::BatchMismatch(self.records.len(), scores.len()));
        }

        for (record, score) in self.records.iter_mut().zip(scores) {
            record.set_similarity_score(Some(score));
        }
        self.scored = true;
        debug!(
            "evaluate_pairwise_similarity: scored {} pairs",
            self.records.len()
        );
        Ok(())
    }

    /// Keep pairs scoring strictly above `threshold`. Runs the evaluation
    /// pass first when the collection has not been scored yet.
    pub fn similarity_cutoff<S>(&mut self, threshold: f32, scorer: &S) -> Result<(), Error>
    where
        S: SimilarityScorer + ?Sized,
    {
        if !self.scored {
            self.evaluate_pairwise_similarity(scorer)?;
        }

        let before = self.records.len();
        self.records
            .retain(|record| matches!(record.similarity_score(), Some(score) if score > threshold));
        debug!(
            "similarity_cutoff({}): removed {} pairs, {} left",
            threshold,
            before - self.records.len(),
            self.records.len()
        );
        Ok(())
    }

    /// Shrink the collection to the size given by `spec`.
    ///
    /// With `randomize`, survivors are drawn index-by-index from a
    /// generator seeded with `seed` (entropy-seeded when absent): draws
    /// are independent and with replacement, so duplicates are possible
    /// and the result follows draw order. Without `randomize` the
    /// collection is truncated to its prefix.
    ///
    /// A [SizeSpec::Count] above the current size warns and leaves the
    /// collection untouched; an out-of-range [SizeSpec::Ratio] or an
    /// empty collection is an error.
    pub fn downsample(
        &mut self,
        spec: SizeSpec,
        randomize: bool,
        seed: Option<u64>,
    ) -> Result<(), Error> {
        if self.records.is_empty() {
            return Err(Error::EmptyCollection("downsample"));
        }

        let target = match spec {
            SizeSpec::Ratio(ratio) => {
                if !(ratio > 0.0 && ratio <= 1.0) {
                    return Err(Error::InvalidRatio(ratio));
                }
                (self.records.len() as f64 * ratio).floor() as usize
            }
            SizeSpec::Count(count) => {
                if count > self.records.len() {
                    warn!(
                        "downsample: requested {} of {} pairs, nothing to remove",
                        count,
                        self.records.len()
                    );
                    return Ok(());
                }
                count
            }
        };

        let before = self.records.len();
        if randomize {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let sampled: Vec<PairRecord> = (0..target)
                .map(|_| self.records[rng.gen_range(0..self.records.len())].clone())
                .collect();
            self.records = sampled;
        } else {
            self.records.truncate(target);
        }
        debug!("downsample: {} -> {} pairs", before, self.records.len());
        Ok(())
    }

    /// Persist the collection, one record per line, in collection order.
    /// Returns the number of records written.
    pub fn write_to_file(&self, dst: &Path) -> Result<usize, Error> {
        let mut writer = JsonlWriter::create(dst)?;
        writer.write(&self.records)?;
        writer.flush()?;
        info!("wrote {} pairs to {:?}", writer.written(), dst);
        Ok(writer.written())
    }
}
