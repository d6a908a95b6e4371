use crate::library::{Library, Song};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::path::PathBuf;

/// One drawn slot of a playlist, detached from the library so the
/// caller can keep it after further draws mutate the counters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub artist: String,
    pub title: String,
    pub location: PathBuf,
}

/// Draw one song. Two stages: pick an eligible priority tier by weighted
/// choice, then pick uniformly among that tier's least-played songs. The
/// winner's repeat count is incremented before it is returned, so within a
/// tier no song repeats until every other song has caught up.
///
/// `None` means no tier is eligible (every weight zero, or every weighted
/// tier empty) — a defined outcome, and nothing is mutated.
pub fn draw<'a, R: Rng + ?Sized>(library: &'a mut Library, rng: &mut R) -> Option<&'a Song> {
    let tier = pick_tier(library, rng)?;

    let mut candidates: Vec<&mut Song> = library
        .songs_mut()
        .filter(|s| s.priority == tier)
        .collect();
    let lowest = candidates.iter().map(|s| s.repeat_count).min()?;
    candidates.retain(|s| s.repeat_count == lowest);

    let chosen = candidates.swap_remove(rng.random_range(0..candidates.len()));
    chosen.repeat_count += 1;
    Some(chosen)
}

/// Weighted choice among eligible tiers. A tier is eligible when its weight
/// is positive AND it has at least one song — a weighted but empty tier is
/// silently skipped rather than an error.
fn pick_tier<R: Rng + ?Sized>(library: &Library, rng: &mut R) -> Option<u32> {
    let counts = library.tier_counts();
    let eligible: Vec<u32> = (0..library.priority_levels())
        .filter(|&p| library.weights[p as usize] > 0 && counts[p as usize] > 0)
        .collect();

    eligible
        .choose_weighted(rng, |&p| library.weights[p as usize])
        .ok()
        .copied()
}

/// Draw `n` songs in order. Stops early if the library runs out of
/// eligible tiers (only possible when nothing was eligible to begin
/// with — a successful draw never empties a tier).
pub fn build_playlist<R: Rng + ?Sized>(
    library: &mut Library,
    n: u32,
    rng: &mut R,
) -> Vec<PlaylistEntry> {
    let mut entries = Vec::with_capacity(n as usize);
    for _ in 0..n {
        match draw(library, rng) {
            Some(song) => entries.push(PlaylistEntry {
                artist: song.artist.clone(),
                title: song.title.clone(),
                location: song.location.clone(),
            }),
            None => break,
        }
    }
    entries
}
