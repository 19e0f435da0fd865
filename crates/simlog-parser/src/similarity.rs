//! Sequence similarity based on longest matching blocks (Ratcliff/Obershelp).
//!
//! `ratio` is `2 * M / T`, where `T` is the combined length of both strings
//! and `M` the number of characters covered by matching blocks. Blocks are
//! found by taking the longest common substring, then recursing on the
//! pieces to its left and right.
//!
//! For second strings of 200 characters or more, characters occurring in
//! more than 1% of positions are not used to seed a match (they can still
//! extend one). This keeps long, repetitive bodies from dominating the score.

use std::collections::HashMap;

const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity of `a` and `b` in `[0, 1]`; two empty strings score 1.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = SequenceMatcher::new(&a, &b).matching_chars();
    2.0 * matches as f64 / total as f64
}

struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character in `b`, ascending, minus popular characters.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let limit = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest block `(i, j, size)` with `a[i..i+size] == b[j..j+size]`
    /// inside the given ranges. Ties go to the earliest `i`, then earliest `j`.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters never seed a match but may still extend one.
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }

    /// Total characters covered by all matching blocks.
    fn matching_chars(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings() {
        assert_eq!(ratio("timeout", "timeout"), 1.0);
    }

    #[test]
    fn both_empty() {
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn one_empty() {
        assert_eq!(ratio("abc", ""), 0.0);
        assert_eq!(ratio("", "abc"), 0.0);
    }

    #[test]
    fn disjoint_strings() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn shared_prefix() {
        // 7 shared of 20 total characters.
        assert_eq!(ratio("abcdefghij", "abcdefgxyz"), 0.7);
    }

    #[test]
    fn blocks_on_both_sides() {
        // "ab" and "d" match around the differing middle.
        let r = ratio("abcd", "abxd");
        assert!((r - 0.75).abs() < 1e-12);
    }

    #[test]
    fn shifted_overlap() {
        let r = ratio("abcd", "bcde");
        assert!((r - 0.75).abs() < 1e-12);
    }

    #[test]
    fn symmetric_for_simple_cases() {
        let a = "POST /api/orders 500";
        let b = "POST /api/order 502";
        assert!((ratio(a, b) - ratio(b, a)).abs() < 1e-12);
    }

    #[test]
    fn unicode_counts_characters() {
        assert_eq!(ratio("héllo", "héllo"), 1.0);
        assert!((ratio("héllo", "hello") - 0.8).abs() < 1e-12);
    }

    #[test]
    fn popular_characters_do_not_seed_matches() {
        // 'a' fills far more than 1% of b, so only the lone 'x' can line up.
        let a = format!("x{}", "a".repeat(250));
        let b = format!("{}x", "a".repeat(250));
        let r = ratio(&a, &b);
        assert!(r < 0.01, "ratio {r} should be near zero");
    }

    #[test]
    fn short_repetitive_strings_match_fully() {
        let a = "a".repeat(50);
        assert_eq!(ratio(&a, &a), 1.0);
    }
}
