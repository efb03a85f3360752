/*! Cleaning output feeding the scoring pipeline. !*/
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use shelob::error::Error;
use shelob::io::reader::source::{SourceFormat, SourceSpec};
use shelob::pipelines::{BitextCleaner, Pipeline, ScoreTranslations};
use shelob::scoring::{MetricSuite, SentenceScores};
use test_log::test;

fn write_lines(dir: &tempfile::TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

/// Character-overlap stand-in for the real metric suite.
struct CharOverlap;

impl MetricSuite for CharOverlap {
    fn sentence_scores(&self, hypothesis: &str, reference: &str) -> Result<SentenceScores, Error> {
        let shared = hypothesis
            .chars()
            .filter(|c| reference.contains(*c))
            .count() as f64;
        let total = hypothesis.chars().count().max(1) as f64;
        let overlap = shared / total;
        Ok(SentenceScores {
            bleu: overlap,
            chrf: overlap,
            ter: 1.0 - overlap,
            bert_score_f1: overlap,
        })
    }
}

#[test]
fn cleaned_pairs_feed_the_scoring_run() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_lines(
        &dir,
        "corpus.en",
        &[
            "The weather is lovely today",
            "Duplicate line on both sides",
            "Good morning to everyone here",
        ],
    );
    let target = write_lines(
        &dir,
        "corpus.ru",
        &[
            "Погода сегодня прекрасная",
            "Duplicate line on both sides",
            "Доброе утро всем присутствующим здесь",
        ],
    );
    let clean = dir.path().join("clean.jsonl");

    let stats = BitextCleaner::new(
        SourceSpec::new(&source, SourceFormat::Plain),
        SourceSpec::new(&target, SourceFormat::Plain),
        "en",
        "ru",
        clean.clone(),
    )
    .run()
    .unwrap();
    assert_eq!(stats.pairs_written, 2);

    // one hypothesis per surviving pair, aligned by position
    let candidate = write_lines(
        &dir,
        "hypotheses.ru",
        &["Погода сегодня прекрасная", "Доброе утро"],
    );
    let scores = dir.path().join("scores.jsonl");

    let written = ScoreTranslations::new(
        clean,
        vec![candidate],
        scores.clone(),
        "en",
        "ru",
        CharOverlap,
    )
    .run()
    .unwrap();
    assert_eq!(written, 2);

    let records: Vec<serde_json::Value> = std::fs::read_to_string(&scores)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(records[0]["source"], "The weather is lovely today");
    assert_eq!(records[0]["hypothesis"], "Погода сегодня прекрасная");
    assert_eq!(records[0]["bleu"], 1.0);
    assert_eq!(records[0]["ter"], 0.0);
    assert!(records[0]["id"].is_string());

    assert_eq!(records[1]["source"], "Good morning to everyone here");
    assert!(records[1]["bleu"].as_f64().unwrap() > 0.9);
}
