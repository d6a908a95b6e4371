pub mod filename;

use crate::SUPPORTED_EXTENSIONS;
use crate::library::{Library, Song};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

#[derive(Debug)]
pub struct ScanReport {
    pub categories: usize,
    pub songs: usize,
    pub skipped: usize,
}

/// Scan a music directory into a fresh library. Immediate subdirectories of
/// `root` become categories; files directly inside a category directory with
/// a supported extension and an `Artist - Title` filename become songs.
/// Deeper nesting is ignored. Every song starts at priority 0 with zero
/// repeats; weights start all-zero at `priority_levels` slots.
///
/// Files that are non-audio or don't parse are skipped with a warning and
/// counted in the report, never fatal.
pub fn scan(root: &Path, priority_levels: usize) -> Result<(Library, ScanReport), ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut library = Library::new(priority_levels);

    // First pass: category directories and their files, in name order so
    // repeated scans of the same tree produce the same library layout.
    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        match entry.depth() {
            1 if entry.file_type().is_dir() => {
                let name = entry.file_name().to_string_lossy().to_string();
                library.categories.entry(name).or_default();
            }
            2 if entry.file_type().is_file() => {
                let category = entry
                    .path()
                    .parent()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string());
                if let Some(category) = category {
                    files.push((category, entry.into_path()));
                }
            }
            _ => {}
        }
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) ({eta}) {msg}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );
    pb.set_message("Scanning...");

    let mut songs = 0usize;
    let mut skipped = 0usize;

    for (category, path) in files {
        pb.inc(1);

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            log::debug!("Skipping non-audio file {}", path.display());
            skipped += 1;
            continue;
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let Some(parsed) = filename::parse_song_name(stem) else {
            log::warn!(
                "Skipping {} — filename is not \"Artist - Title\"",
                path.display()
            );
            skipped += 1;
            continue;
        };

        let song = Song::new(&parsed.artist, &parsed.title, path);
        library
            .categories
            .entry(category)
            .or_default()
            .push(song);
        songs += 1;
    }

    for (category, artist, title) in library.duplicate_identities() {
        log::warn!("Duplicate identity \"{artist} - {title}\" in category \"{category}\"");
    }

    let report = ScanReport {
        categories: library.categories.len(),
        songs,
        skipped,
    };
    pb.finish_with_message(format!(
        "Done: {} categories, {} songs, {} skipped",
        report.categories, report.songs, report.skipped
    ));

    Ok((library, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    fn music_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let rock = dir.path().join("rock");
        let jazz = dir.path().join("jazz");
        fs::create_dir(&rock).unwrap();
        fs::create_dir(&jazz).unwrap();
        touch(&rock.join("Boston - Peace of Mind.mp3"));
        touch(&rock.join("Kansas - Dust in the Wind.flac"));
        touch(&jazz.join("Miles Davis - So What.mp3"));
        dir
    }

    #[test]
    fn test_scan_builds_categories_and_songs() {
        let dir = music_tree();
        let (lib, report) = scan(dir.path(), 10).unwrap();

        assert_eq!(report.categories, 2);
        assert_eq!(report.songs, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(lib.weights, vec![0; 10]);

        let rock = &lib.categories["rock"];
        assert_eq!(rock.len(), 2);
        assert!(rock.iter().any(|s| s.identity() == ("Boston", "Peace of Mind")));
        assert!(lib.songs().all(|s| s.priority == 0 && s.repeat_count == 0));
    }

    #[test]
    fn test_scan_skips_unparseable_and_non_audio() {
        let dir = music_tree();
        let rock = dir.path().join("rock");
        touch(&rock.join("no dash here.mp3"));
        touch(&rock.join("cover.jpg"));

        let (lib, report) = scan(dir.path(), 10).unwrap();
        assert_eq!(report.songs, 3);
        assert_eq!(report.skipped, 2);
        assert_eq!(lib.categories["rock"].len(), 2);
    }

    #[test]
    fn test_scan_ignores_deep_nesting_and_root_files() {
        let dir = music_tree();
        // A file at the root and one nested too deep are both outside the
        // category/file shape.
        touch(&dir.path().join("Stray - File.mp3"));
        let deep = dir.path().join("rock").join("bootlegs");
        fs::create_dir(&deep).unwrap();
        touch(&deep.join("Boston - Foreplay.mp3"));

        let (lib, report) = scan(dir.path(), 10).unwrap();
        assert_eq!(report.songs, 3);
        assert_eq!(lib.categories["rock"].len(), 2);
    }

    #[test]
    fn test_scan_keeps_empty_categories() {
        let dir = music_tree();
        fs::create_dir(dir.path().join("ambient")).unwrap();

        let (lib, report) = scan(dir.path(), 10).unwrap();
        assert_eq!(report.categories, 3);
        assert!(lib.categories["ambient"].is_empty());
    }

    #[test]
    fn test_scan_rejects_missing_root() {
        let err = scan(Path::new("/nonexistent/music"), 10).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_scan_trims_identity_fields() {
        let dir = tempfile::tempdir().unwrap();
        let cat = dir.path().join("rock");
        fs::create_dir(&cat).unwrap();
        touch(&cat.join(" Boston  -  Peace of Mind .mp3"));

        let (lib, _) = scan(dir.path(), 10).unwrap();
        assert_eq!(lib.categories["rock"][0].identity(), ("Boston", "Peace of Mind"));
    }
}
