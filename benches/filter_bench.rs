use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shelob::filtering::pair::{CommonPrefix, EditRatio, TokenCount};
use shelob::filtering::Filter;
use shelob::pipelines::bitext::types::PairRecord;

pub fn fuzzy_ratio(c: &mut Criterion) {
    let pair = PairRecord::new(
        0,
        "en",
        "ru",
        "The quick brown fox jumps over the lazy dog near the river bank".to_string(),
        "Быстрая коричневая лиса перепрыгивает через ленивую собаку у берега реки".to_string(),
    );
    c.bench_function("fuzzy_ratio", |b| b.iter(|| black_box(&pair).fuzzy_ratio()));
}

pub fn filter_chain(c: &mut Criterion) {
    let records: Vec<PairRecord> = (0..128u64)
        .map(|i| {
            PairRecord::new(
                i,
                "en",
                "ru",
                format!("Sentence number {} with a handful of tokens", i),
                format!("Предложение номер {} с несколькими словами", i),
            )
        })
        .collect();
    let ratio = EditRatio::default();
    let tokens = TokenCount::default();
    let prefix = CommonPrefix::default();
    c.bench_function("filter_chain_128", |b| {
        b.iter(|| {
            records
                .iter()
                .filter(|r| ratio.detect(black_box(*r)))
                .filter(|r| tokens.detect(black_box(*r)))
                .filter(|r| prefix.detect(black_box(*r)))
                .count()
        })
    });
}

criterion_group!(benches, fuzzy_ratio, filter_chain);
criterion_main!(benches);
