/// Single-character insert/delete/substitute edit distance.
///
/// Works on `char`s with two rolling rows, so memory is linear in the shorter
/// input.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let (long, short): (Vec<char>, Vec<char>) = if a.chars().count() >= b.chars().count() {
        (a.chars().collect(), b.chars().collect())
    } else {
        (b.chars().collect(), a.chars().collect())
    };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for (i, cl) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cs) in short.iter().enumerate() {
            let cost = usize::from(cl != cs);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[short.len()]
}

/// Ratcliff/Obershelp similarity in `[0, 1]`: twice the matched characters
/// over the combined length. Two empty strings are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Indices of `keys` scoring at least `cutoff` against `query`, best first.
///
/// Equal scores keep the order of `keys`. At most `limit` indices are returned.
pub fn close_matches<S: AsRef<str>>(
    query: &str,
    keys: &[S],
    limit: usize,
    cutoff: f64,
) -> Vec<(usize, f64)> {
    if limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f64)> = keys
        .iter()
        .enumerate()
        .filter_map(|(index, key)| {
            let score = similarity_ratio(query, key.as_ref());
            (score >= cutoff).then_some((index, score))
        })
        .collect();

    scored.sort_by(|left, right| right.1.total_cmp(&left.1).then(left.0.cmp(&right.0)));
    scored.truncate(limit);
    scored
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Among equally long blocks the one starting earliest in `a`, then in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let offset = j - blo;
            curr[offset + 1] = if a[i] == b[j] { prev[offset] + 1 } else { 0 };
            let run = curr[offset + 1];
            if run > best.2 {
                best = (i + 1 - run, j + 1 - run, run);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
