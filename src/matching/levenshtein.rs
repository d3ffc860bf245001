//! Levenshtein edit distance and the similarity ratio built on it.
//!
//! Used by the match engine as the fuzzy fallback when neither ingredient
//! name contains the other.

use std::collections::HashMap;

/// Similarity threshold for ingredient name comparison.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Maximum character count for the part of each input the DP table covers.
///
/// Shared prefixes and suffixes are stripped first, so long strings that
/// differ in a few places still get an exact distance. Past this limit
/// [`bag_distance`] stands in for the table. Ingredient names are nowhere
/// near this long.
const MAX_LEVENSHTEIN_INPUT: usize = 10_000;

/// Compute the Levenshtein edit distance between two strings.
///
/// Returns the minimum number of single-character edits (insertions,
/// deletions, substitutions) required to transform `a` into `b`. Characters
/// are Unicode scalar values, not bytes.
///
/// If the differing middle of either input still exceeds
/// [`MAX_LEVENSHTEIN_INPUT`] characters after the common prefix and suffix
/// are removed, returns the bag distance instead. That is a lower bound, so
/// [`similar`] can only err toward a match.
pub fn distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let prefix = a_chars
        .iter()
        .zip(&b_chars)
        .take_while(|(x, y)| x == y)
        .count();
    let (a_rest, b_rest) = (&a_chars[prefix..], &b_chars[prefix..]);
    let suffix = a_rest
        .iter()
        .rev()
        .zip(b_rest.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let a_core = &a_rest[..a_rest.len() - suffix];
    let b_core = &b_rest[..b_rest.len() - suffix];

    let m = a_core.len();
    let n = b_core.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    if m > MAX_LEVENSHTEIN_INPUT || n > MAX_LEVENSHTEIN_INPUT {
        return bag_distance(a_core, b_core);
    }

    // Two rows instead of the full table.
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_core[i - 1] != b_core[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Multiset difference of the two character bags, `max(|a - b|, |b - a|)`.
///
/// Each edit removes at most one character from each side of the
/// difference, so this never exceeds the Levenshtein distance.
fn bag_distance(a: &[char], b: &[char]) -> usize {
    let mut counts: HashMap<char, isize> = HashMap::new();
    for &c in a {
        *counts.entry(c).or_default() += 1;
    }
    for &c in b {
        *counts.entry(c).or_default() -= 1;
    }

    let (only_a, only_b) = counts
        .values()
        .fold((0usize, 0usize), |(pos, neg), &v| {
            if v > 0 {
                (pos + v.unsigned_abs(), neg)
            } else {
                (pos, neg + v.unsigned_abs())
            }
        });
    only_a.max(only_b)
}

/// Similarity ratio between two strings: `(max_len - distance) / max_len`.
///
/// 0.0 = completely different, 1.0 = identical. Two empty strings are
/// identical.
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let dist = distance(a, b);
    (max_len - dist) as f64 / max_len as f64
}

/// Whether `a` and `b` are at least `threshold` similar.
///
/// No normalization happens here; callers trim and lowercase first.
pub fn similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) >= threshold
}
