/*! Hypothesis scoring pipeline.

[ScoreTranslations] walks a cleaned pair file in lockstep with one or
more candidate translation files (one hypothesis per line, aligned by
position) and scores every hypothesis against the pair's target side.

The walk stops at the shortest file. A record is only emitted once every
candidate file produced a line for it, so a truncated candidate file
never leaves half-scored records behind.
!*/
use std::path::PathBuf;

use log::{info, warn};

use super::types::ScoredPair;
use crate::error::Error;
use crate::io::reader::{LineReader, PairReader};
use crate::io::writer::JsonlWriter;
use crate::pipelines::pipeline::Pipeline;
use crate::scoring::MetricSuite;

pub struct ScoreTranslations<M> {
    reference: PathBuf,
    candidates: Vec<PathBuf>,
    dst: PathBuf,
    source_label: String,
    target_label: String,
    split_beams: bool,
    metrics: M,
}

impl<M> ScoreTranslations<M> {
    pub fn new(
        reference: PathBuf,
        candidates: Vec<PathBuf>,
        dst: PathBuf,
        source_label: &str,
        target_label: &str,
        metrics: M,
    ) -> Self {
        Self {
            reference,
            candidates,
            dst,
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            split_beams: false,
            metrics,
        }
    }

    /// Treat every candidate line as tab-separated beam hypotheses and
    /// score each beam on its own.
    pub fn with_split_beams(mut self) -> Self {
        self.split_beams = true;
        self
    }
}

impl<M> Pipeline<usize> for ScoreTranslations<M>
where
    M: MetricSuite,
{
    /// Returns the number of scored hypotheses written.
    fn run(&self) -> Result<usize, Error> {
        if self.candidates.is_empty() {
            return Err(Error::Custom("no candidate files to score".to_string()));
        }

        let reference = PairReader::from_path(
            &self.reference,
            &self.source_label,
            &self.target_label,
            None,
            0,
        )?;
        let mut candidates = Vec::with_capacity(self.candidates.len());
        for path in &self.candidates {
            candidates.push(LineReader::from_path(path, None, 0)?);
        }
        let mut writer = JsonlWriter::create(&self.dst)?;

        let mut scored_records = 0;
        'pairs: for record in reference {
            let record = record?;

            let mut lines = Vec::with_capacity(candidates.len());
            for candidate in &mut candidates {
                match candidate.next() {
                    Some(line) => lines.push(line?),
                    None => {
                        warn!("candidate file exhausted, stopping at {} records", scored_records);
                        break 'pairs;
                    }
                }
            }

            for line in &lines {
                let hypotheses: Vec<&str> = if self.split_beams {
                    line.split('\t').collect()
                } else {
                    vec![line.as_str()]
                };
                for hypothesis in hypotheses {
                    let scores = self
                        .metrics
                        .sentence_scores(hypothesis, record.target_text())?;
                    let scored =
                        ScoredPair::new(record.id(), record.source_text(), hypothesis, scores);
                    writer.write_single(&scored)?;
                }
            }
            scored_records += 1;
        }
        writer.flush()?;

        info!(
            "scored {} hypotheses over {} records into {:?}",
            writer.written(),
            scored_records,
            self.dst
        );
        Ok(writer.written())
    }
}
