use crate::library::{Library, LibraryError};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid library: {0}")]
    Invalid(#[from] LibraryError),
}

/// Save the library as pretty-printed JSON. Written to a temp file beside
/// the target and renamed into place, so a crash mid-write never leaves a
/// truncated library behind.
pub fn save(library: &Library, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut json = serde_json::to_string_pretty(library)?;
    json.push('\n');

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    fs::write(tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Load a library from JSON, validating the priority invariant at this
/// boundary — the rest of the crate assumes it holds. Duplicate identities
/// are warned about but tolerated (the reconciler aliases them).
pub fn load(path: &Path) -> Result<Library, StoreError> {
    let contents = fs::read_to_string(path)?;
    let library: Library = serde_json::from_str(&contents)?;
    library.validate()?;

    for (category, artist, title) in library.duplicate_identities() {
        log::warn!("Duplicate identity \"{artist} - {title}\" in category \"{category}\"");
    }

    Ok(library)
}
