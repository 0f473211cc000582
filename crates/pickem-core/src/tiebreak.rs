// Tiebreaker total-points pick.
//
// Samples from a short list of common final totals, weighted toward values
// near the posted over/under and toward the front of the list.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Common game totals, most frequent first.
pub const DEFAULT_TOTALS: [u32; 13] = [41, 37, 51, 44, 40, 43, 47, 33, 48, 30, 34, 55, 45];

/// Sampling weight for each candidate.
///
/// `1 / (1 + |c - over_under|)` scaled by a linear position prior
/// `(k - i) / k`, so earlier entries get a mild boost.
pub fn tiebreaker_weights(over_under: f64, candidates: &[u32]) -> Vec<f64> {
    let k = candidates.len() as f64;
    candidates
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let distance = 1.0 / (1.0 + (c as f64 - over_under).abs());
            let position = (k - i as f64) / k;
            distance * position
        })
        .collect()
}

/// Pick a tiebreaker total for a game with the given over/under.
///
/// Returns `None` only when `candidates` is empty. If the weights cannot be
/// used (NaN over/under, all zero) the pick is uniform.
pub fn tiebreaker_total<R: Rng + ?Sized>(
    over_under: f64,
    candidates: &[u32],
    rng: &mut R,
) -> Option<u32> {
    if candidates.is_empty() {
        return None;
    }
    let weights = tiebreaker_weights(over_under, candidates);
    match WeightedIndex::new(&weights) {
        Ok(dist) => Some(candidates[dist.sample(rng)]),
        Err(_) => Some(candidates[rng.gen_range(0..candidates.len())]),
    }
}
