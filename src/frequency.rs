use crate::library::Library;

/// Expected number of playlist slots between successive plays of the same
/// song, per priority tier, over a playlist of `playlist_length` draws.
/// `None` marks an undefined slot: a tier with zero weight or no songs is
/// never selected, so it has no expected gap.
///
/// For an eligible tier the per-song per-draw probability is
/// `(weights[p] / W) / n_p`, with `W` summed over eligible tiers only
/// (matching the selector's eligibility rule); the expected gap is its
/// reciprocal scaled by the playlist length:
/// `playlist_length * W * n_p / weights[p]`.
pub fn expected_frequency(library: &Library, playlist_length: u32) -> Vec<Option<f64>> {
    let counts = library.tier_counts();
    let eligible_weight_sum: u32 = library
        .weights
        .iter()
        .zip(&counts)
        .filter(|&(&w, &n)| w > 0 && n > 0)
        .map(|(&w, _)| w)
        .sum();

    library
        .weights
        .iter()
        .zip(&counts)
        .map(|(&weight, &count)| {
            if weight == 0 || count == 0 {
                None
            } else {
                Some(
                    f64::from(playlist_length) * f64::from(eligible_weight_sum) * count as f64
                        / f64::from(weight),
                )
            }
        })
        .collect()
}
