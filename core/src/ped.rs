//! Bounded prefix edit distance.
//!
//! `ped(x, y)` is the smallest Levenshtein distance between `x` and any prefix
//! of `y`. Only the first `|x| + delta` chars of `y` can take part in an
//! alignment within `delta` edits, so the DP never looks further right than
//! that, whatever the length of `y`.

/// Prefix edit distance from `query` to `candidate`, capped at `delta + 1`.
///
/// Both arguments are expected to be normalized already. A return value of
/// `delta + 1` means "more than `delta`".
pub fn prefix_edit_distance(query: &str, candidate: &str, delta: usize) -> usize {
    let query: Vec<char> = query.chars().collect();
    let cols = candidate.chars().count().min(query.len() + delta) + 1;
    let candidate: Vec<char> = candidate.chars().take(cols - 1).collect();

    // Row 0: transforming "" into candidate[..j] costs j.
    let mut prev: Vec<usize> = (0..cols).collect();
    let mut curr: Vec<usize> = vec![0; cols];
    for (i, &qc) in query.iter().enumerate() {
        curr[0] = i + 1;
        for j in 1..cols {
            let diag = prev[j - 1] + usize::from(qc != candidate[j - 1]);
            let top = prev[j] + 1;
            let left = curr[j - 1] + 1;
            curr[j] = diag.min(top).min(left);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    // `prev` is now the last row: the full query against every prefix.
    let best = prev.iter().copied().min().unwrap_or(query.len());
    best.min(delta + 1)
}
