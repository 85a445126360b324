//! Edit distance used for fuzzy term matching.
//!
//! Distances are computed over Unicode scalar values. Adjacent
//! transpositions count as a single edit (optimal string alignment), which
//! matches how search backends treat fuzzy terms by default.

use std::cmp::min;

/// Edit distance between two strings, counting adjacent transpositions as one edit.
pub fn edit_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    osa_distance(&a, &b, usize::MAX).unwrap_or(usize::MAX)
}

/// Edit distance bounded by `max_edits`.
///
/// Returns `None` as soon as the distance is known to exceed `max_edits`,
/// which keeps candidate filtering cheap for long terms.
pub fn edit_distance_within(s1: &str, s2: &str, max_edits: usize) -> Option<usize> {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.len().abs_diff(b.len()) > max_edits {
        return None;
    }

    osa_distance(&a, &b, max_edits)
}

fn osa_distance(a: &[char], b: &[char], max_edits: usize) -> Option<usize> {
    if a.is_empty() {
        return (b.len() <= max_edits).then_some(b.len());
    }
    if b.is_empty() {
        return (a.len() <= max_edits).then_some(a.len());
    }

    // Three rows: the one before last is needed for transpositions.
    let mut before: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        let mut row_min = curr[0];

        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = min(min(prev[j] + 1, curr[j - 1] + 1), prev[j - 1] + cost);

            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = min(best, before[j - 2] + 1);
            }

            curr[j] = best;
            row_min = min(row_min, best);
        }

        if row_min > max_edits {
            return None;
        }

        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= max_edits).then_some(distance)
}
