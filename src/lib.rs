pub mod config;
pub mod frequency;
pub mod library;
pub mod reconcile;
pub mod scanner;
pub mod selector;
pub mod store;

/// Audio file extensions we support
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "wav", "m4a", "aac", "opus", "wma",
];

/// Application name for XDG paths
pub const APP_NAME: &str = "rotor";
