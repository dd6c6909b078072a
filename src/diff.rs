//! Unified diffs between two line sequences.
//!
//! The common prefix and suffix are trimmed, the remaining lines are interned
//! to integer ids and matched with Hirschberg's linear-space
//! longest-common-subsequence search. Hunks are minimal and deterministic:
//! for a changed span, removals are listed before additions.

use std::collections::HashMap;
use std::fmt::Write;

pub const DEFAULT_CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Delete,
    Insert,
}

/// One edit step. `a` and `b` are the positions in the original and
/// proposed sequences *before* the step is applied.
#[derive(Debug, Clone, Copy)]
struct Op {
    tag: Tag,
    a: usize,
    b: usize,
}

/// Last row of the LCS length table: `row[j]` is the LCS length of `a` and
/// the first `j` ids of `b`. With `reverse`, both inputs are read back to
/// front, so `row[j]` covers the last `j` ids of `b`.
fn lcs_row(a: &[u32], b: &[u32], reverse: bool) -> Vec<usize> {
    let m = b.len();
    let at = |s: &[u32], i: usize| if reverse { s[s.len() - 1 - i] } else { s[i] };

    let mut prev = vec![0usize; m + 1];
    let mut cur = vec![0usize; m + 1];
    for i in 0..a.len() {
        let x = at(a, i);
        for j in 1..=m {
            cur[j] = if x == at(b, j - 1) {
                prev[j - 1] + 1
            } else {
                prev[j].max(cur[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Push the matched `(a, b)` index pairs of an LCS of `a` and `b`, in order.
fn hirschberg(a: &[u32], b: &[u32], a_off: usize, b_off: usize, out: &mut Vec<(usize, usize)>) {
    if a.is_empty() || b.is_empty() {
        return;
    }
    if a.len() == 1 {
        if let Some(j) = b.iter().position(|&y| y == a[0]) {
            out.push((a_off, b_off + j));
        }
        return;
    }

    let mid = a.len() / 2;
    let head = lcs_row(&a[..mid], b, false);
    let tail = lcs_row(&a[mid..], b, true);
    let m = b.len();
    let split = (0..=m)
        .max_by_key(|&j| (head[j] + tail[m - j], std::cmp::Reverse(j)))
        .unwrap_or(0);

    hirschberg(&a[..mid], &b[..split], a_off, b_off, out);
    hirschberg(&a[mid..], &b[split..], a_off + mid, b_off + split, out);
}

fn intern<'a, S: AsRef<str>>(ids: &mut HashMap<&'a str, u32>, lines: &'a [S]) -> Vec<u32> {
    lines
        .iter()
        .map(|line| {
            let next = ids.len() as u32;
            *ids.entry(line.as_ref()).or_insert(next)
        })
        .collect()
}

fn edit_script<S: AsRef<str>>(a: &[S], b: &[S]) -> Vec<Op> {
    let prefix = a
        .iter()
        .zip(b)
        .take_while(|(x, y)| x.as_ref() == y.as_ref())
        .count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x.as_ref() == y.as_ref())
        .count();

    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];

    let mut ids = HashMap::new();
    let a_ids = intern(&mut ids, a_mid);
    let b_ids = intern(&mut ids, b_mid);

    let mut matches = Vec::new();
    hirschberg(&a_ids, &b_ids, 0, 0, &mut matches);
    matches.push((a_mid.len(), b_mid.len()));

    let mut ops = Vec::with_capacity(a.len().max(b.len()) + 1);
    for k in 0..prefix {
        ops.push(Op { tag: Tag::Equal, a: k, b: k });
    }

    let (mut i, mut j) = (0, 0);
    for (mi, mj) in matches {
        while i < mi {
            ops.push(Op { tag: Tag::Delete, a: prefix + i, b: prefix + j });
            i += 1;
        }
        while j < mj {
            ops.push(Op { tag: Tag::Insert, a: prefix + i, b: prefix + j });
            j += 1;
        }
        if i < a_mid.len() && j < b_mid.len() {
            ops.push(Op { tag: Tag::Equal, a: prefix + i, b: prefix + j });
            i += 1;
            j += 1;
        }
    }

    for k in 0..suffix {
        ops.push(Op {
            tag: Tag::Equal,
            a: prefix + a_mid.len() + k,
            b: prefix + b_mid.len() + k,
        });
    }
    ops
}

/// `start,count` in the conventional 1-based form; a single line drops the
/// count and an empty range points at the line before it.
fn format_range(start: usize, count: usize) -> String {
    match count {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, count),
    }
}

/// Render a unified diff. Returns an empty string when the sequences match.
pub fn unified_diff<S: AsRef<str>>(
    original: &[S],
    proposed: &[S],
    from_label: &str,
    to_label: &str,
    context: usize,
) -> String {
    let ops = edit_script(original, proposed);
    let changed: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| op.tag != Tag::Equal)
        .map(|(i, _)| i)
        .collect();
    if changed.is_empty() {
        return String::new();
    }

    // Group change indices whose separating run of equal lines fits in the
    // shared context window.
    let mut groups: Vec<(usize, usize)> = Vec::new();
    for &idx in &changed {
        match groups.last_mut() {
            Some((_, end)) if idx - *end <= 2 * context + 1 => *end = idx,
            _ => groups.push((idx, idx)),
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "--- {from_label}");
    let _ = writeln!(out, "+++ {to_label}");

    for (first, last) in groups {
        let lo = first.saturating_sub(context);
        let hi = (last + context).min(ops.len() - 1);
        let hunk = &ops[lo..=hi];

        let a_count = hunk.iter().filter(|op| op.tag != Tag::Insert).count();
        let b_count = hunk.iter().filter(|op| op.tag != Tag::Delete).count();
        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            format_range(hunk[0].a, a_count),
            format_range(hunk[0].b, b_count)
        );

        for op in hunk {
            let _ = match op.tag {
                Tag::Equal => writeln!(out, " {}", original[op.a].as_ref()),
                Tag::Delete => writeln!(out, "-{}", original[op.a].as_ref()),
                Tag::Insert => writeln!(out, "+{}", proposed[op.b].as_ref()),
            };
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i:02}")).collect()
    }

    fn diff(a: &[String], b: &[String]) -> String {
        unified_diff(a, b, "a", "b", DEFAULT_CONTEXT)
    }

    fn hunk_headers(d: &str) -> Vec<&str> {
        d.lines().filter(|l| l.starts_with("@@")).collect()
    }

    #[test]
    fn test_identical_is_empty() {
        let a = lines(10);
        assert_eq!(diff(&a, &a), "");
        let empty: Vec<String> = vec![];
        assert_eq!(diff(&empty, &empty), "");
    }

    #[test]
    fn test_swap_first_and_last() {
        let b = lines(32);
        let mut a = b.clone();
        a.swap(0, 31);
        let d = diff(&a, &b);
        assert_eq!(hunk_headers(&d), vec!["@@ -1,4 +1,4 @@", "@@ -29,4 +29,4 @@"]);
        let body: Vec<&str> = d.lines().skip(3).take(2).collect();
        assert_eq!(body, vec!["-line 32", "+line 01"]);
    }

    #[test]
    fn test_trailing_removal() {
        let b = lines(32);
        let mut a = b.clone();
        a.push("line 32".to_string());
        let d = diff(&a, &b);
        assert_eq!(hunk_headers(&d), vec!["@@ -30,4 +30,3 @@"]);
        assert!(d.ends_with("-line 32\n"));
    }

    #[test]
    fn test_nearby_changes_share_a_hunk() {
        let a = lines(12);
        let mut b = a.clone();
        b[3] = "changed".into();
        b[8] = "changed too".into();
        let d = diff(&a, &b);
        assert_eq!(hunk_headers(&d), vec!["@@ -1,12 +1,12 @@"]);
    }

    #[test]
    fn test_large_swap_stays_small() {
        let b: Vec<String> = (0..5_000).map(|i| format!("item {i:05}")).collect();
        let mut a = b.clone();
        a.swap(0, 4_999);
        let d = diff(&a, &b);
        assert_eq!(
            hunk_headers(&d),
            vec!["@@ -1,4 +1,4 @@", "@@ -4997,4 +4997,4 @@"]
        );
        assert_eq!(d.lines().filter(|l| l.starts_with('-')).count(), 3);
        assert_eq!(d.lines().filter(|l| l.starts_with('+')).count(), 3);
    }

    #[test]
    fn test_lcs_matches_interleaved_edits() {
        let a: Vec<String> = ["a", "b", "c", "d", "e", "f"].map(String::from).to_vec();
        let b: Vec<String> = ["b", "x", "c", "e", "f", "y"].map(String::from).to_vec();
        let d = diff(&a, &b);
        let body: Vec<&str> = d.lines().skip(3).collect();
        assert_eq!(body, vec!["-a", " b", "+x", " c", "-d", " e", " f", "+y"]);
    }

    #[test]
    fn test_single_line_ranges() {
        let a = vec!["x".to_string()];
        let b = vec!["y".to_string()];
        assert_eq!(hunk_headers(&diff(&a, &b)), vec!["@@ -1 +1 @@"]);
        let empty: Vec<String> = vec![];
        assert_eq!(hunk_headers(&diff(&empty, &b)), vec!["@@ -0,0 +1 @@"]);
    }

    #[test]
    fn test_labels() {
        let a = vec!["x".to_string()];
        let b = vec!["y".to_string()];
        let d = unified_diff(&a, &b, "ledger.csv", "ledger.csv (sorted)", 3);
        assert!(d.starts_with("--- ledger.csv\n+++ ledger.csv (sorted)\n"));
    }
}
