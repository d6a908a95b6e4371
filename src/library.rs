use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Number of priority tiers when neither the config file nor the CLI says otherwise.
pub const DEFAULT_PRIORITY_LEVELS: usize = 10;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("library has no priority levels (empty weights array)")]
    NoPriorityLevels,
    #[error(
        "priority {priority} out of range for \"{artist} - {title}\" in \"{category}\" (levels: 0..{levels})"
    )]
    PriorityOutOfRange {
        category: String,
        artist: String,
        title: String,
        priority: u32,
        levels: u32,
    },
    #[error("priority {priority} out of range (levels: 0..{levels})")]
    InvalidPriority { priority: u32, levels: u32 },
    #[error("no weight slot for priority {priority} (levels: 0..{levels})")]
    WeightOutOfRange { priority: u32, levels: u32 },
    #[error("no category named \"{0}\"")]
    NoSuchCategory(String),
    #[error("no song \"{artist} - {title}\" in category \"{category}\"")]
    NoSuchSong {
        category: String,
        artist: String,
        title: String,
    },
}

/// One track in the rotation. Identity for reconciliation is the
/// `(artist, title)` pair; `location` can change between rescans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub artist: String,
    pub title: String,
    pub location: PathBuf,
    pub priority: u32,
    pub repeat_count: u32,
}

impl Song {
    /// New song with scan defaults. Artist and title are trimmed here,
    /// at creation — identity matching later is exact equality.
    pub fn new(artist: &str, title: &str, location: PathBuf) -> Self {
        Self {
            artist: artist.trim().to_string(),
            title: title.trim().to_string(),
            location,
            priority: 0,
            repeat_count: 0,
        }
    }

    pub fn identity(&self) -> (&str, &str) {
        (&self.artist, &self.title)
    }
}

/// The whole rotation state: ordered categories of songs plus the
/// per-priority weight table. The number of priority levels is the
/// length of `weights`, fixed when the library is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub categories: IndexMap<String, Vec<Song>>,
    pub weights: Vec<u32>,
}

impl Library {
    /// Empty library with `priority_levels` all-zero weight slots.
    pub fn new(priority_levels: usize) -> Self {
        Self {
            categories: IndexMap::new(),
            weights: vec![0; priority_levels],
        }
    }

    pub fn priority_levels(&self) -> u32 {
        self.weights.len() as u32
    }

    /// All songs across all categories, category order then insertion order.
    pub fn songs(&self) -> impl Iterator<Item = &Song> {
        self.categories.values().flatten()
    }

    pub fn songs_mut(&mut self) -> impl Iterator<Item = &mut Song> {
        self.categories.values_mut().flatten()
    }

    pub fn song_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Number of songs in one priority tier.
    pub fn tier_count(&self, priority: u32) -> usize {
        self.songs().filter(|s| s.priority == priority).count()
    }

    /// Tier membership for every priority level at once.
    pub fn tier_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.weights.len()];
        for song in self.songs() {
            if let Some(slot) = counts.get_mut(song.priority as usize) {
                *slot += 1;
            }
        }
        counts
    }

    /// Check the structural invariants: at least one priority level and
    /// every song's priority inside `[0, levels)`. Run at load time;
    /// components past that boundary assume it holds.
    pub fn validate(&self) -> Result<(), LibraryError> {
        if self.weights.is_empty() {
            return Err(LibraryError::NoPriorityLevels);
        }
        let levels = self.priority_levels();
        for (category, songs) in &self.categories {
            for song in songs {
                if song.priority >= levels {
                    return Err(LibraryError::PriorityOutOfRange {
                        category: category.clone(),
                        artist: song.artist.clone(),
                        title: song.title.clone(),
                        priority: song.priority,
                        levels,
                    });
                }
            }
        }
        Ok(())
    }

    /// Identity pairs that occur more than once within a single category,
    /// as `(category, artist, title)` — one entry per duplicated identity.
    /// Duplicates make reconciliation alias all matches, so callers warn
    /// on these rather than fail.
    pub fn duplicate_identities(&self) -> Vec<(String, String, String)> {
        let mut dups = Vec::new();
        for (category, songs) in &self.categories {
            let mut seen: IndexMap<(&str, &str), usize> = IndexMap::new();
            for song in songs {
                *seen.entry(song.identity()).or_insert(0) += 1;
            }
            for ((artist, title), count) in seen {
                if count > 1 {
                    dups.push((category.clone(), artist.to_string(), title.to_string()));
                }
            }
        }
        dups
    }

    /// Zero every song's repeat count. Priorities and weights are untouched.
    pub fn reset_repeat_counts(&mut self) {
        for song in self.songs_mut() {
            song.repeat_count = 0;
        }
    }

    /// Assign `priority` to every song in `category` matching the identity
    /// pair. Duplicated identities are all updated, consistent with how
    /// reconciliation treats them. Returns how many songs changed.
    pub fn set_priority(
        &mut self,
        category: &str,
        artist: &str,
        title: &str,
        priority: u32,
    ) -> Result<usize, LibraryError> {
        let levels = self.priority_levels();
        if priority >= levels {
            return Err(LibraryError::InvalidPriority { priority, levels });
        }
        let songs = self
            .categories
            .get_mut(category)
            .ok_or_else(|| LibraryError::NoSuchCategory(category.to_string()))?;

        let mut updated = 0;
        for song in songs.iter_mut() {
            if song.identity() == (artist, title) {
                song.priority = priority;
                updated += 1;
            }
        }
        if updated == 0 {
            return Err(LibraryError::NoSuchSong {
                category: category.to_string(),
                artist: artist.to_string(),
                title: title.to_string(),
            });
        }
        Ok(updated)
    }

    /// Set the weight for one priority slot.
    pub fn set_weight(&mut self, priority: u32, weight: u32) -> Result<(), LibraryError> {
        let levels = self.priority_levels();
        match self.weights.get_mut(priority as usize) {
            Some(slot) => {
                *slot = weight;
                Ok(())
            }
            None => Err(LibraryError::WeightOutOfRange { priority, levels }),
        }
    }
}
