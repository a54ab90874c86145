//! Did-you-mean suggestions for unresolved identifiers.
//!
//! The resolution pass feeds the identifiers visible in the current scope
//! chain through [`find_similar`] to attach a `help:` hint to
//! `UNDECLARED_IDENTIFIER` diagnostics.

/// Computes the edit distance between two identifiers.
///
/// Single-row dynamic programming over bytes: KUSH identifiers are ASCII
/// by construction (letters, digits, underscores), so byte positions and
/// character positions coincide. The row holds the previous column of the
/// distance matrix; `diagonal` carries the cell the row overwrote one step
/// ago.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();

    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &byte_a) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, &byte_b) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(byte_a != byte_b);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}

/// Returns the candidate closest to `word` within `max_distance` edits.
///
/// Ties resolve to the candidate seen first.
pub fn find_similar<'a, I>(word: &str, candidates: I, max_distance: usize) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        let dist = edit_distance(word, candidate);
        if dist <= max_distance {
            match best {
                None => best = Some((candidate, dist)),
                Some((_, d)) if dist < d => best = Some((candidate, dist)),
                _ => {}
            }
        }
    }

    best.map(|(s, _)| s)
}
