//! Definition text merging
//!
//! Dictionary lookups for the same word tend to return near-duplicate
//! phrasing across repeated lookups, differing only in punctuation or
//! whitespace. Exact-match deduplication under-merges, so new lines are
//! compared against the stored lines with a character-level similarity
//! ratio and dropped when the score reaches a threshold.
//!
//! The merge operates on trimmed, non-empty lines; blank separator lines
//! are not preserved. Existing lines always survive unchanged, and new
//! lines that survive are appended in their original relative order.

use std::collections::{HashMap, HashSet};

/// Similarity at or above this ratio counts as a duplicate line.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Split a content blob into trimmed, non-empty lines.
pub fn split_content_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Merge newly fetched definition text into existing content using the
/// default similarity threshold.
pub fn merge_definitions(existing: &str, new: &str) -> String {
    merge_definitions_with_threshold(existing, new, DEFAULT_SIMILARITY_THRESHOLD)
}

/// Merge newly fetched definition text into existing content.
///
/// Every line of `existing` (after trim/empty-filter) appears in the
/// output. A line of `new` is appended only when it is neither identical
/// to nor similar (ratio >= `threshold`, inclusive) to any line of the
/// original existing content. New lines are not compared against each
/// other, only against what was already stored.
pub fn merge_definitions_with_threshold(existing: &str, new: &str, threshold: f64) -> String {
    let existing_lines = split_content_lines(existing);
    let new_lines = split_content_lines(new);

    // Identical lines can skip the ratio scan entirely.
    let existing_set: HashSet<&str> = existing_lines.iter().map(String::as_str).collect();

    let mut merged = existing_lines.clone();
    for line in &new_lines {
        if existing_set.contains(line.as_str()) {
            continue;
        }
        let is_duplicate = existing_lines
            .iter()
            .any(|kept| similarity_ratio(kept, line) >= threshold);
        if !is_duplicate {
            merged.push(line.clone());
        }
    }

    merged.join("\n")
}

/// Character-level sequence-alignment similarity in [0, 1].
///
/// Computed as `2 * M / (len(a) + len(b))` where `M` is the total length
/// of the longest-matching-block decomposition of the two strings.
/// Identical strings score 1.0, as do two empty strings; strings with no
/// characters in common score 0.0.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total size of all matching blocks between `a` and `b`.
///
/// Finds the longest contiguous match, then recurses (via an explicit
/// stack) into the unmatched regions to its left and right.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    // Index of each character's positions in b, in ascending order.
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b_positions.entry(c).or_default().push(j);
    }

    let mut total = 0;
    let mut regions = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = regions.pop() {
        let (i, j, size) = longest_match(a, &b_positions, alo, ahi, blo, bhi);
        if size > 0 {
            total += size;
            regions.push((alo, i, blo, j));
            regions.push((i + size, ahi, j + size, bhi));
        }
    }
    total
}

/// Longest contiguous matching block within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, size)` such that `a[i..i+size] == b[j..j+size]`. Of all
/// maximal blocks, the earliest in `a` (then in `b`) is returned, which
/// keeps the decomposition deterministic.
fn longest_match(
    a: &[char],
    b_positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0;

    // run_lengths[j] = length of the match ending at a[i], b[j]
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_positions.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let length = if j == blo {
                    1
                } else {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                next_runs.insert(j, length);
                if length > best_size {
                    best_i = i + 1 - length;
                    best_j = j + 1 - length;
                    best_size = length;
                }
            }
        }
        run_lengths = next_runs;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical() {
        assert_eq!(similarity_ratio("feline", "feline"), 1.0);
    }

    #[test]
    fn test_ratio_both_empty() {
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_ratio_disjoint() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_ratio_one_empty() {
        assert_eq!(similarity_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_ratio_trailing_punctuation() {
        // 32 shared chars out of 32 + 33
        let ratio = similarity_ratio(
            "cat: a small domesticated feline",
            "cat: a small domesticated feline.",
        );
        assert!(ratio > 0.95 && ratio < 1.0);
    }

    #[test]
    fn test_ratio_symmetric() {
        let a = "run: to move swiftly on foot";
        let b = "run: move swiftly";
        assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a));
    }

    #[test]
    fn test_ratio_multibyte() {
        // char-level, not byte-level: 3 of 4 characters shared
        let ratio = similarity_ratio("名词: 猫", "名词: 狗");
        assert_eq!(ratio, 2.0 * 4.0 / 10.0);
    }

    #[test]
    fn test_merge_near_duplicate_dropped() {
        let merged = merge_definitions(
            "cat: a small domesticated feline",
            "cat: a small domesticated feline.",
        );
        assert_eq!(merged, "cat: a small domesticated feline");
    }

    #[test]
    fn test_merge_into_empty() {
        let merged = merge_definitions("", "run: to move swiftly on foot");
        assert_eq!(merged, "run: to move swiftly on foot");
    }

    #[test]
    fn test_merge_nothing_new() {
        let existing = "run: to move swiftly on foot\nrun: a period of running";
        assert_eq!(merge_definitions(existing, ""), existing);
    }

    #[test]
    fn test_merge_idempotent() {
        let text = "n. a fortunate accident\nadj. lucky";
        assert_eq!(merge_definitions(text, text), text);
    }

    #[test]
    fn test_merge_appends_in_order() {
        let merged = merge_definitions("first line", "second line added\nthird line appended");
        assert_eq!(merged, "first line\nsecond line added\nthird line appended");
    }

    #[test]
    fn test_merge_monotonic() {
        let existing = "alpha definition\nbeta definition";
        let merged = merge_definitions(existing, "gamma definition");
        for line in split_content_lines(existing) {
            assert!(merged.lines().any(|l| l == line));
        }
        assert!(merged.lines().count() >= 2);
    }

    #[test]
    fn test_merge_threshold_inclusive() {
        // similarity_ratio("abcd", "abcdxy") == 2*4/10 == 0.8 exactly,
        // which must count as a duplicate
        assert_eq!(similarity_ratio("abcd", "abcdxy"), 0.8);
        assert_eq!(merge_definitions_with_threshold("abcd", "abcdxy", 0.8), "abcd");
    }

    #[test]
    fn test_merge_below_threshold_kept() {
        assert_eq!(similarity_ratio("abcd", "abxy"), 0.5);
        assert_eq!(
            merge_definitions_with_threshold("abcd", "abxy", 0.8),
            "abcd\nabxy"
        );
    }

    #[test]
    fn test_merge_blank_lines_discarded() {
        let merged = merge_definitions("first\n\n  \nsecond", "\nthird\n\n");
        assert_eq!(merged, "first\nsecond\nthird");
    }

    #[test]
    fn test_merge_trims_lines() {
        let merged = merge_definitions("  padded line  ", "padded line");
        assert_eq!(merged, "padded line");
    }

    #[test]
    fn test_new_lines_compared_against_stored_only() {
        // Two near-identical new lines both survive; deduplication is
        // against stored content, not within the fetched batch.
        let merged = merge_definitions("unrelated stored line", "fresh sense one\nfresh sense one.");
        assert_eq!(
            merged,
            "unrelated stored line\nfresh sense one\nfresh sense one."
        );
    }
}
