/*! Aligned sentence pairs.

[PairRecord] holds one source/target sentence pair along with its side
labels and an optional similarity score. The quality metrics consumed by
the filtering stages are computed on demand from the two texts, never
stored.
!*/
use std::hash::Hasher;

use serde::ser::{Serialize, SerializeMap, Serializer};
use twox_hash::XxHash64;

use crate::urls;

/// Target size for downsampling: either a share of the current collection
/// or an absolute record count. Exactly one of the two can be expressed,
/// which keeps "ratio or count?" ambiguity out of the call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    /// Keep `floor(len * ratio)` records. The ratio must lie in `(0, 1]`.
    Ratio(f64),
    /// Keep exactly this many records.
    Count(usize),
}

/// One aligned sentence pair.
///
/// The identifier is computed once at creation and stays stable for the
/// life of the record, across serialization and re-reading. Records
/// cloned by sampling share the identifier of their original.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRecord {
    id: String,
    source_label: String,
    target_label: String,
    source_text: String,
    target_text: String,
    similarity_score: Option<f32>,
}

impl PairRecord {
    /// Create a record at the given creation position.
    /// `position` feeds the identifier digest, so records created at
    /// different positions get different identifiers even for equal texts.
    pub fn new(
        position: u64,
        source_label: &str,
        target_label: &str,
        source_text: String,
        target_text: String,
    ) -> Self {
        let id = digest(position, &source_text, &target_text);
        Self {
            id,
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            source_text,
            target_text,
            similarity_score: None,
        }
    }

    /// Rebuild a record read back from a persisted corpus, keeping its
    /// original identifier. The similarity score is not persisted, so a
    /// restored record is always unscored.
    pub fn restored(
        id: String,
        source_label: &str,
        target_label: &str,
        source_text: String,
        target_text: String,
    ) -> Self {
        Self {
            id,
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            source_text,
            target_text,
            similarity_score: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    /// Get the record's similarity score, if a scoring pass has run.
    pub fn similarity_score(&self) -> Option<f32> {
        self.similarity_score
    }

    pub fn set_similarity_score(&mut self, score: Option<f32>) {
        self.similarity_score = score;
    }

    /// `true` when both sides are exactly equal.
    pub fn is_identical(&self) -> bool {
        self.source_text == self.target_text
    }

    /// Character-level edit-distance similarity on a 0 to 100 scale:
    /// `100 * (1 - distance / max_chars)`. Two empty texts count as
    /// identical (100).
    pub fn fuzzy_ratio(&self) -> f64 {
        let source: Vec<char> = self.source_text.chars().collect();
        let target: Vec<char> = self.target_text.chars().collect();
        let max_len = source.len().max(target.len());
        if max_len == 0 {
            return 100.0;
        }

        let distance = levenshtein(&source, &target);
        100.0 * (1.0 - distance as f64 / max_len as f64)
    }

    pub fn source_token_count(&self) -> usize {
        self.source_text.split_whitespace().count()
    }

    pub fn target_token_count(&self) -> usize {
        self.target_text.split_whitespace().count()
    }

    /// Absolute difference between the two sides' token counts.
    pub fn token_diff(&self) -> usize {
        self.source_token_count()
            .abs_diff(self.target_token_count())
    }

    pub fn source_char_count(&self) -> usize {
        self.source_text.chars().count()
    }

    pub fn target_char_count(&self) -> usize {
        self.target_text.chars().count()
    }

    /// Length in characters of the longest common prefix of the two sides.
    pub fn common_prefix_len(&self) -> usize {
        self.source_text
            .chars()
            .zip(self.target_text.chars())
            .take_while(|(s, t)| s == t)
            .count()
    }

    /// Common prefix length divided by the target character count.
    /// Defined as 0 when the target is empty.
    pub fn common_prefix_ratio(&self) -> f64 {
        let target_len = self.target_char_count();
        if target_len == 0 {
            return 0.0;
        }
        self.common_prefix_len() as f64 / target_len as f64
    }

    /// `true` when either side contains something URL-shaped.
    pub fn has_url(&self) -> bool {
        urls::contains_url(&self.source_text) || urls::contains_url(&self.target_text)
    }
}

/// Records are persisted as `{"id": .., "<source_label>": .., "<target_label>": ..}`,
/// with the side labels as keys. The similarity score never reaches the
/// output file.
impl Serialize for PairRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry(&self.source_label, &self.source_text)?;
        map.serialize_entry(&self.target_label, &self.target_text)?;
        map.end()
    }
}

fn digest(position: u64, source_text: &str, target_text: &str) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write_u64(position);
    hasher.write(source_text.as_bytes());
    hasher.write(target_text.as_bytes());
    format!("{:016x}", hasher.finish())
}

/// Plain two-row Levenshtein over characters.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = if ca == cb { prev[j] } else { prev[j] + 1 };
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(source: &str, target: &str) -> PairRecord {
        PairRecord::new(0, "en", "ru", source.to_string(), target.to_string())
    }

    #[test]
    fn fuzzy_ratio_identical() {
        assert_eq!(pair("Hello world", "Hello world").fuzzy_ratio(), 100.0);
    }

    #[test]
    fn fuzzy_ratio_both_empty() {
        assert_eq!(pair("", "").fuzzy_ratio(), 100.0);
    }

    #[test]
    fn fuzzy_ratio_known_distance() {
        // levenshtein("kitten", "sitting") == 3, longest side 7
        let expected = 100.0 * (1.0 - 3.0 / 7.0);
        assert!((pair("kitten", "sitting").fuzzy_ratio() - expected).abs() < 1e-9);
    }

    #[test]
    fn fuzzy_ratio_counts_chars_not_bytes() {
        // one substitution over three cyrillic chars
        let expected = 100.0 * (1.0 - 1.0 / 3.0);
        assert!((pair("кот", "кит").fuzzy_ratio() - expected).abs() < 1e-9);
    }

    #[test]
    fn token_counts_collapse_whitespace() {
        let p = pair("a  b\tc", "слово");
        assert_eq!(p.source_token_count(), 3);
        assert_eq!(p.target_token_count(), 1);
        assert_eq!(p.token_diff(), 2);
    }

    #[test]
    fn token_diff_is_symmetric() {
        assert_eq!(pair("a", "b c d").token_diff(), 2);
        assert_eq!(pair("b c d", "a").token_diff(), 2);
    }

    #[test]
    fn char_counts_are_scalar_counts() {
        let p = pair("naïve", "кот");
        assert_eq!(p.source_char_count(), 5);
        assert_eq!(p.target_char_count(), 3);
    }

    #[test]
    fn common_prefix() {
        let p = pair("Hello world", "Hello there");
        assert_eq!(p.common_prefix_len(), 6);
        assert!((p.common_prefix_ratio() - 6.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn common_prefix_ratio_empty_target() {
        let p = pair("Hello", "");
        assert_eq!(p.common_prefix_ratio(), 0.0);
    }

    #[test]
    fn url_flag_checks_both_sides() {
        assert!(pair("see https://example.com", "обычный текст").has_url());
        assert!(pair("plain text", "см. www.example.ru").has_url());
        assert!(!pair("plain text", "обычный текст").has_url());
    }

    #[test]
    fn ids_depend_on_position() {
        let a = PairRecord::new(0, "en", "ru", "x".to_string(), "y".to_string());
        let b = PairRecord::new(1, "en", "ru", "x".to_string(), "y".to_string());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn ids_are_stable() {
        let a = PairRecord::new(7, "en", "ru", "x".to_string(), "y".to_string());
        let b = PairRecord::new(7, "en", "ru", "x".to_string(), "y".to_string());
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id().len(), 16);
    }

    #[test]
    fn restored_keeps_identifier() {
        let p = PairRecord::restored(
            "deadbeefdeadbeef".to_string(),
            "en",
            "ru",
            "x".to_string(),
            "y".to_string(),
        );
        assert_eq!(p.id(), "deadbeefdeadbeef");
        assert_eq!(p.similarity_score(), None);
    }

    #[test]
    fn serializes_with_label_keys_and_raw_unicode() {
        let p = pair("Hello world", "Привет мир");
        let json = serde_json::to_string(&p).unwrap();
        let expected = format!(
            "{{\"id\":\"{}\",\"en\":\"Hello world\",\"ru\":\"Привет мир\"}}",
            p.id()
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn score_does_not_serialize() {
        let mut p = pair("a", "b");
        p.set_similarity_score(Some(0.9));
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("similarity"));
        assert!(!json.contains("0.9"));
    }
}
