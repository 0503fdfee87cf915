// src/text/similarity.rs - token-overlap similarity and near-duplicate consolidation
use std::cmp::Ordering;
use std::collections::HashSet;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
pub const DEFAULT_CONSOLIDATION_ANCHORS: usize = 10;

/// A candidate phrase with its accumulated occurrence count.
pub type RankedPair = (String, usize);

fn lowercase_tokens(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Share of `shorter`'s tokens that also appear in `longer`.
fn overlap_ratio(shorter: &[String], longer: &[String]) -> f64 {
    let longer_set: HashSet<&str> = longer.iter().map(|s| s.as_str()).collect();
    let total = shorter
        .iter()
        .filter(|token| longer_set.contains(token.as_str()))
        .count();
    total as f64 / shorter.len() as f64
}

/// Token-overlap similarity between two phrases.
///
/// The tokens of the shorter phrase are looked up (case-insensitively) in the
/// longer phrase; the phrases are similar when the share found is at least
/// `threshold`. With equal token counts both directions are tried and the larger
/// share wins, which keeps the relation symmetric.
pub fn similar(phrase1: &str, phrase2: &str, threshold: f64) -> bool {
    let tokens1 = lowercase_tokens(phrase1);
    let tokens2 = lowercase_tokens(phrase2);

    if tokens1.is_empty() || tokens2.is_empty() {
        return tokens1.is_empty() && tokens2.is_empty();
    }

    let ratio = match tokens1.len().cmp(&tokens2.len()) {
        Ordering::Less => overlap_ratio(&tokens1, &tokens2),
        Ordering::Greater => overlap_ratio(&tokens2, &tokens1),
        Ordering::Equal => {
            overlap_ratio(&tokens1, &tokens2).max(overlap_ratio(&tokens2, &tokens1))
        }
    };

    ratio >= threshold
}

/// Sorts by count descending, breaking ties on the phrase so the order never
/// depends on hash-map iteration.
pub fn sort_ranked(pairs: &mut [RankedPair]) {
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}

/// Folds the long tail of a ranked list into its top `length` entries.
///
/// The top `length` pairs by count are anchors. Every other pair that is
/// similar to an anchor adds its count to the first such anchor and disappears;
/// pairs similar to no anchor are kept as they are. Anchor strings never change.
pub fn consolidate_freqs(freqs: &[RankedPair], length: usize) -> Vec<RankedPair> {
    consolidate_freqs_with_threshold(freqs, length, DEFAULT_SIMILARITY_THRESHOLD)
}

pub fn consolidate_freqs_with_threshold(
    freqs: &[RankedPair],
    length: usize,
    threshold: f64,
) -> Vec<RankedPair> {
    let mut ranked = freqs.to_vec();
    sort_ranked(&mut ranked);

    let split = length.min(ranked.len());
    let rest = ranked.split_off(split);
    let mut consolidated = ranked;

    for (phrase, count) in rest {
        match consolidated
            .iter_mut()
            .take(split)
            .find(|(anchor, _)| similar(&phrase, anchor, threshold))
        {
            Some(anchor) => anchor.1 += count,
            None => consolidated.push((phrase, count)),
        }
    }

    sort_ranked(&mut consolidated);
    consolidated
}

/// One left-to-right greedy pass. Returns the compacted list and whether
/// anything was merged.
fn compact_pass(top: &[RankedPair], threshold: f64) -> (Vec<RankedPair>, bool) {
    let mut absorbed = vec![false; top.len()];
    let mut compact = Vec::with_capacity(top.len());
    let mut merged = false;

    for i in 0..top.len() {
        if absorbed[i] {
            continue;
        }
        let (phrase, count) = &top[i];
        let mut representative = phrase.clone();
        let mut total = *count;

        for j in (i + 1)..top.len() {
            if absorbed[j] {
                continue;
            }
            let (other, other_count) = &top[j];
            if similar(phrase, other, threshold) {
                total += other_count;
                absorbed[j] = true;
                merged = true;
                if other.chars().count() > representative.chars().count() {
                    representative = other.clone();
                }
            }
        }

        compact.push((representative, total));
    }

    sort_ranked(&mut compact);
    (compact, merged)
}

/// Greedy pairwise de-duplication of a ranked list.
///
/// Each surviving pair absorbs every later pair similar to it, summing counts
/// and keeping the longest phrase seen as its representative. Passes repeat
/// until one makes no merge, so the result is a fixed point: running it again
/// with the same threshold changes nothing, and the total count is unchanged.
///
/// This is O(n²) per pass and order dependent; it is not an optimal clustering.
pub fn compact_top(top: &[RankedPair], threshold: f64) -> Vec<RankedPair> {
    let mut current = top.to_vec();
    sort_ranked(&mut current);
    loop {
        let (next, merged) = compact_pass(&current, threshold);
        current = next;
        if !merged {
            return current;
        }
    }
}
