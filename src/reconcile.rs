use crate::library::{Library, Song};
use std::collections::{HashMap, HashSet};

/// What happened during a merge, for reporting.
#[derive(Debug, Default, PartialEq)]
pub struct ReconcileReport {
    /// Fresh songs that inherited state from the old library.
    pub carried: usize,
    /// Fresh songs with no old counterpart (kept scan defaults).
    pub added: usize,
    /// Old songs with no fresh counterpart (no longer on disk).
    pub dropped: usize,
}

/// Merge a fresh scan with the previous library. The result has `fresh`'s
/// membership; where an identity pair matches within the same category, the
/// old priority is carried over, and the old repeat count too when
/// `carry_usage` is set. Weights always come from `old` — they are a global
/// tuning parameter independent of what the scan found.
///
/// Duplicate identities are aliased deliberately: every fresh match receives
/// the carried values, and among old duplicates the last one wins.
pub fn reconcile(old: &Library, mut fresh: Library, carry_usage: bool) -> (Library, ReconcileReport) {
    let mut report = ReconcileReport::default();

    for (name, songs) in &mut fresh.categories {
        let Some(old_songs) = old.categories.get(name) else {
            report.added += songs.len();
            continue;
        };

        // Last-wins on duplicate old identities. Values are copied out so
        // the lookup key's borrow of `song` ends before the writes below.
        let index: HashMap<(&str, &str), (u32, u32)> = old_songs
            .iter()
            .map(|s| (s.identity(), (s.priority, s.repeat_count)))
            .collect();

        for song in songs.iter_mut() {
            let prev = index.get(&song.identity()).copied();
            match prev {
                Some((priority, repeat_count)) => {
                    song.priority = priority;
                    if carry_usage {
                        song.repeat_count = repeat_count;
                    }
                    report.carried += 1;
                }
                None => report.added += 1,
            }
        }
    }

    for (name, old_songs) in &old.categories {
        match fresh.categories.get(name) {
            Some(songs) => {
                let fresh_ids: HashSet<(&str, &str)> =
                    songs.iter().map(Song::identity).collect();
                report.dropped += old_songs
                    .iter()
                    .filter(|s| !fresh_ids.contains(&s.identity()))
                    .count();
            }
            None => report.dropped += old_songs.len(),
        }
    }

    fresh.weights = old.weights.clone();
    (fresh, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn song(artist: &str, title: &str, location: &str, priority: u32, repeats: u32) -> Song {
        Song {
            priority,
            repeat_count: repeats,
            ..Song::new(artist, title, PathBuf::from(location))
        }
    }

    fn library(categories: Vec<(&str, Vec<Song>)>, weights: Vec<u32>) -> Library {
        let mut lib = Library::new(weights.len());
        lib.weights = weights;
        for (name, songs) in categories {
            lib.categories.insert(name.to_string(), songs);
        }
        lib
    }

    #[test]
    fn test_carries_priority_and_usage() {
        let old = library(
            vec![("rock", vec![song("Artist", "Song", "/old/a.mp3", 3, 5)])],
            vec![1, 0, 0, 4, 0],
        );
        // Same identity, different location — the directory moved.
        let fresh = library(
            vec![("rock", vec![song("Artist", "Song", "/new/a.mp3", 0, 0)])],
            vec![0; 5],
        );

        let (merged, report) = reconcile(&old, fresh, true);
        let s = &merged.categories["rock"][0];
        assert_eq!(s.priority, 3);
        assert_eq!(s.repeat_count, 5);
        assert_eq!(s.location, PathBuf::from("/new/a.mp3"));
        assert_eq!(merged.weights, vec![1, 0, 0, 4, 0]);
        assert_eq!(report, ReconcileReport { carried: 1, added: 0, dropped: 0 });
    }

    #[test]
    fn test_carry_usage_false_resets_counts() {
        let old = library(
            vec![("rock", vec![song("Artist", "Song", "/a.mp3", 3, 5)])],
            vec![0; 5],
        );
        let fresh = library(
            vec![("rock", vec![song("Artist", "Song", "/a.mp3", 0, 0)])],
            vec![0; 5],
        );

        let (merged, _) = reconcile(&old, fresh, false);
        let s = &merged.categories["rock"][0];
        assert_eq!(s.priority, 3);
        assert_eq!(s.repeat_count, 0);
    }

    #[test]
    fn test_dropped_and_added_categories() {
        let old = library(
            vec![("gone", vec![song("A", "One", "/1.mp3", 2, 1)])],
            vec![0; 5],
        );
        let fresh = library(
            vec![("new", vec![song("B", "Two", "/2.mp3", 0, 0)])],
            vec![0; 5],
        );

        let (merged, report) = reconcile(&old, fresh, true);
        assert!(!merged.categories.contains_key("gone"));
        let s = &merged.categories["new"][0];
        assert_eq!((s.priority, s.repeat_count), (0, 0));
        assert_eq!(report, ReconcileReport { carried: 0, added: 1, dropped: 1 });
    }

    #[test]
    fn test_removed_song_dropped_without_error() {
        let old = library(
            vec![(
                "rock",
                vec![
                    song("Keep", "Me", "/k.mp3", 4, 2),
                    song("Gone", "Away", "/g.mp3", 1, 9),
                ],
            )],
            vec![0; 5],
        );
        let fresh = library(
            vec![("rock", vec![song("Keep", "Me", "/k.mp3", 0, 0)])],
            vec![0; 5],
        );

        let (merged, report) = reconcile(&old, fresh, true);
        assert_eq!(merged.categories["rock"].len(), 1);
        assert_eq!(merged.categories["rock"][0].priority, 4);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_duplicate_fresh_identities_all_aliased() {
        let old = library(
            vec![("rock", vec![song("Artist", "Song", "/a.mp3", 6, 3)])],
            vec![0; 10],
        );
        let fresh = library(
            vec![(
                "rock",
                vec![
                    song("Artist", "Song", "/a.mp3", 0, 0),
                    song("Artist", "Song", "/copy/a.mp3", 0, 0),
                ],
            )],
            vec![0; 10],
        );

        let (merged, report) = reconcile(&old, fresh, true);
        assert!(merged.categories["rock"].iter().all(|s| s.priority == 6));
        assert!(merged.categories["rock"].iter().all(|s| s.repeat_count == 3));
        assert_eq!(report.carried, 2);
    }

    #[test]
    fn test_duplicate_old_identities_last_wins() {
        let old = library(
            vec![(
                "rock",
                vec![
                    song("Artist", "Song", "/a.mp3", 2, 1),
                    song("Artist", "Song", "/b.mp3", 8, 7),
                ],
            )],
            vec![0; 10],
        );
        let fresh = library(
            vec![("rock", vec![song("Artist", "Song", "/a.mp3", 0, 0)])],
            vec![0; 10],
        );

        let (merged, _) = reconcile(&old, fresh, true);
        assert_eq!(merged.categories["rock"][0].priority, 8);
        assert_eq!(merged.categories["rock"][0].repeat_count, 7);
    }

    #[test]
    fn test_same_name_across_categories_does_not_match() {
        let old = library(
            vec![("rock", vec![song("Artist", "Song", "/a.mp3", 5, 2)])],
            vec![0; 10],
        );
        let fresh = library(
            vec![("jazz", vec![song("Artist", "Song", "/a.mp3", 0, 0)])],
            vec![0; 10],
        );

        let (merged, report) = reconcile(&old, fresh, true);
        assert_eq!(merged.categories["jazz"][0].priority, 0);
        assert_eq!(report, ReconcileReport { carried: 0, added: 1, dropped: 1 });
    }
}
