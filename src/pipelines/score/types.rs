//! Scored hypothesis records.
use serde::{Deserialize, Serialize};

use crate::scoring::SentenceScores;

/// One hypothesis scored against its reference translation.
///
/// Persisted as a flat JSON object so downstream analysis can load the
/// scores without knowing the metric suite that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredPair {
    id: String,
    source: String,
    hypothesis: String,
    bleu: f64,
    chrf: f64,
    ter: f64,
    bert_score_f1: f64,
}

impl ScoredPair {
    pub fn new(id: &str, source: &str, hypothesis: &str, scores: SentenceScores) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            hypothesis: hypothesis.to_string(),
            bleu: scores.bleu,
            chrf: scores.chrf,
            ter: scores.ter,
            bert_score_f1: scores.bert_score_f1,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn hypothesis(&self) -> &str {
        &self.hypothesis
    }

    pub fn bleu(&self) -> f64 {
        self.bleu
    }

    pub fn chrf(&self) -> f64 {
        self.chrf
    }

    pub fn ter(&self) -> f64 {
        self.ter
    }

    pub fn bert_score_f1(&self) -> f64 {
        self.bert_score_f1
    }
}
