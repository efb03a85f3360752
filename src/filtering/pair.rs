//! Pair-level filtering.
//!
//! One small predicate per cleaning stage, all operating on
//! [PairRecord] references so stages can be composed in any order.
use super::Filter;
use crate::pipelines::bitext::types::PairRecord;

/// Drops pairs whose two sides are exactly equal.
#[derive(Default)]
pub struct Identity;

impl Filter<&PairRecord> for Identity {
    fn detect(&self, pair: &PairRecord) -> bool {
        !pair.is_identical()
    }
}

/// Drops near-duplicate pairs: a fuzzy ratio at or above
/// [EditRatio::max] means the two sides are too close to be a genuine
/// translation.
pub struct EditRatio {
    max: f64,
}

impl EditRatio {
    pub fn with_max(max: f64) -> Self {
        Self { max }
    }

    /// Get a reference to the edit ratio's max.
    pub fn max(&self) -> &f64 {
        &self.max
    }
}

impl Default for EditRatio {
    /// Default cutoff is a ratio of 75.
    fn default() -> Self {
        EditRatio { max: 75.0 }
    }
}

impl Filter<&PairRecord> for EditRatio {
    fn detect(&self, pair: &PairRecord) -> bool {
        pair.fuzzy_ratio() < self.max
    }
}

/// Keeps pairs whose token counts on both sides lie strictly between
/// [TokenCount::min] and [TokenCount::max].
pub struct TokenCount {
    min: usize,
    max: usize,
}

impl TokenCount {
    pub fn with_bounds(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> &usize {
        &self.min
    }

    pub fn max(&self) -> &usize {
        &self.max
    }
}

impl Default for TokenCount {
    /// Default bounds are (0, 128): non-empty up to 127 tokens a side.
    fn default() -> Self {
        TokenCount { min: 0, max: 128 }
    }
}

impl Filter<&PairRecord> for TokenCount {
    fn detect(&self, pair: &PairRecord) -> bool {
        let source = pair.source_token_count();
        let target = pair.target_token_count();
        source > self.min && source < self.max && target > self.min && target < self.max
    }
}

/// Keeps pairs whose character counts on both sides strictly exceed
/// [CharCount::min].
pub struct CharCount {
    min: usize,
}

impl CharCount {
    pub fn with_min(min: usize) -> Self {
        Self { min }
    }

    pub fn min(&self) -> &usize {
        &self.min
    }
}

impl Default for CharCount {
    /// Default minimum is 2 characters a side.
    fn default() -> Self {
        CharCount { min: 2 }
    }
}

impl Filter<&PairRecord> for CharCount {
    fn detect(&self, pair: &PairRecord) -> bool {
        pair.source_char_count() > self.min && pair.target_char_count() > self.min
    }
}

/// Keeps pairs whose absolute token-count difference is strictly below
/// [TokenDiff::max]. Wildly unbalanced pairs are almost never aligned.
pub struct TokenDiff {
    max: usize,
}

impl TokenDiff {
    pub fn with_max(max: usize) -> Self {
        Self { max }
    }

    pub fn max(&self) -> &usize {
        &self.max
    }
}

impl Default for TokenDiff {
    /// Default maximum difference is 21 tokens.
    fn default() -> Self {
        TokenDiff { max: 21 }
    }
}

impl Filter<&PairRecord> for TokenDiff {
    fn detect(&self, pair: &PairRecord) -> bool {
        pair.token_diff() < self.max
    }
}

/// Keeps pairs whose common-prefix ratio is strictly below
/// [CommonPrefix::max_ratio]. A long shared prefix usually marks
/// untranslated boilerplate.
pub struct CommonPrefix {
    max_ratio: f64,
}

impl CommonPrefix {
    pub fn with_max_ratio(max_ratio: f64) -> Self {
        Self { max_ratio }
    }

    pub fn max_ratio(&self) -> &f64 {
        &self.max_ratio
    }
}

impl Default for CommonPrefix {
    /// Default maximum prefix ratio is 0.3.
    fn default() -> Self {
        CommonPrefix { max_ratio: 0.3 }
    }
}

impl Filter<&PairRecord> for CommonPrefix {
    fn detect(&self, pair: &PairRecord) -> bool {
        pair.common_prefix_ratio() < self.max_ratio
    }
}

/// Keeps pairs where neither side contains a URL.
#[derive(Default)]
pub struct UrlFree;

impl Filter<&PairRecord> for UrlFree {
    fn detect(&self, pair: &PairRecord) -> bool {
        !pair.has_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(source: &str, target: &str) -> PairRecord {
        PairRecord::new(0, "en", "ru", source.to_string(), target.to_string())
    }

    #[test]
    fn identity_drops_equal_sides() {
        let f = Identity;
        assert_eq!(f.detect(&pair("Hello world", "Hello world")), false);
        assert_eq!(f.detect(&pair("Hello world", "Привет мир")), true);
    }

    #[test]
    fn edit_ratio_boundary_is_dropped() {
        // "abcd" vs "abce": distance 1 over 4 chars, ratio 75.0 exactly
        let f = EditRatio::default();
        assert_eq!(f.detect(&pair("abcd", "abce")), false);
        assert_eq!(f.detect(&pair("abcd", "wxyz")), true);
    }

    #[test]
    fn token_count_bounds_are_exclusive() {
        let f = TokenCount::with_bounds(3, 21);
        assert_eq!(f.detect(&pair("one two three", "раз два три")), false);
        assert_eq!(
            f.detect(&pair("one two three four", "раз два три четыре")),
            true
        );
        // one side out of bounds is enough to drop
        assert_eq!(f.detect(&pair("one two three four", "раз два")), false);
    }

    #[test]
    fn char_count_minimum_is_exclusive() {
        let f = CharCount::default();
        assert_eq!(f.detect(&pair("ab", "аб")), false);
        assert_eq!(f.detect(&pair("abc", "абв")), true);
    }

    #[test]
    fn token_diff_bound_is_exclusive() {
        let f = TokenDiff::with_max(2);
        assert_eq!(f.detect(&pair("a b c", "x")), false);
        assert_eq!(f.detect(&pair("a b", "x")), true);
    }

    #[test]
    fn common_prefix_bound_is_exclusive() {
        let f = CommonPrefix::with_max_ratio(0.5);
        // prefix "abc" over target "abcdef": ratio 0.5 exactly
        assert_eq!(f.detect(&pair("abcxyz", "abcdef")), false);
        assert_eq!(f.detect(&pair("abxyzw", "abcdef")), true);
    }

    #[test]
    fn url_free_drops_links_on_either_side() {
        let f = UrlFree;
        assert_eq!(f.detect(&pair("see www.example.com", "текст")), false);
        assert_eq!(f.detect(&pair("text", "https://example.ru/стр")), false);
        assert_eq!(f.detect(&pair("plain text", "обычный текст")), true);
    }
}
