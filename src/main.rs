use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rotor::library::Library;
use rotor::selector::PlaylistEntry;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rotor", version, about = "Weighted music rotation")]
struct Cli {
    /// Path to the library file
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a music directory and create a fresh library
    Scan {
        /// Directory to scan (defaults to config file music_dir)
        path: Option<PathBuf>,

        /// Number of priority tiers (defaults to config priority_levels)
        #[arg(long)]
        levels: Option<usize>,

        /// Overwrite an existing library file
        #[arg(long)]
        force: bool,
    },

    /// Re-scan and merge with the existing library (keeps priorities)
    Rescan {
        /// Directory to scan (defaults to config file music_dir)
        path: Option<PathBuf>,

        /// Also carry repeat counts over to the merged library
        #[arg(long)]
        keep_counts: bool,
    },

    /// Draw songs into a playlist
    Playlist {
        /// Number of songs to draw
        #[arg(short = 'n', long, default_value = "20")]
        count: u32,

        /// Write an M3U file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed the draw for a reproducible playlist
        #[arg(long)]
        seed: Option<u64>,

        /// Don't save the updated repeat counts
        #[arg(long)]
        dry_run: bool,
    },

    /// List songs with their priorities and repeat counts
    Songs {
        /// Only this category
        category: Option<String>,

        /// Only this priority tier
        #[arg(short, long)]
        priority: Option<u32>,
    },

    /// Assign a priority to a song (all copies of the identity in the category)
    SetPriority {
        category: String,
        artist: String,
        title: String,
        priority: u32,
    },

    /// Set the weight of a priority tier
    SetWeight { priority: u32, weight: u32 },

    /// Show the weight table with tier membership and eligibility
    Weights,

    /// Expected playlists between repeats of a song, per tier
    Frequency {
        /// Playlist length the estimate is scaled to
        #[arg(short = 'n', long, default_value = "20")]
        count: u32,
    },

    /// Zero every song's repeat count
    ResetCounts,

    /// Show library statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = rotor::config::AppConfig::load();

    // Resolve library path: CLI > config > XDG default
    let library_path = cli
        .library
        .or(config.library_path.clone())
        .unwrap_or_else(rotor::config::default_library_path);
    log::info!("Library: {}", library_path.display());

    match cli.command {
        Commands::Scan { path, levels, force } => {
            if library_path.exists() && !force {
                anyhow::bail!(
                    "{} already exists — use `rescan` to merge, or --force to overwrite",
                    library_path.display()
                );
            }

            let root = resolve_music_dir(path, &config)?;
            let levels = levels.unwrap_or(config.priority_levels);
            let (library, report) =
                rotor::scanner::scan(&root, levels).context("Scan failed")?;
            rotor::store::save(&library, &library_path).context("Failed to save library")?;
            println!(
                "Scan complete: {} categories, {} songs, {} skipped",
                report.categories, report.songs, report.skipped
            );
            println!("Library written to {}", library_path.display());
        }

        Commands::Rescan { path, keep_counts } => {
            let old = load(&library_path)?;

            let root = resolve_music_dir(path, &config)?;
            let (fresh, _) =
                rotor::scanner::scan(&root, old.weights.len()).context("Scan failed")?;

            let (merged, report) = rotor::reconcile::reconcile(&old, fresh, keep_counts);
            rotor::store::save(&merged, &library_path).context("Failed to save library")?;
            println!(
                "Rescan complete: {} carried, {} new, {} dropped",
                report.carried, report.added, report.dropped
            );
        }

        Commands::Playlist { count, output, seed, dry_run } => {
            let mut library = load(&library_path)?;

            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };
            let playlist = rotor::selector::build_playlist(&mut library, count, &mut rng);

            if playlist.is_empty() {
                println!(
                    "No eligible songs — every weight is zero or every weighted tier is empty."
                );
                println!("Assign weights with `rotor set-weight` and priorities with `rotor set-priority`.");
                return Ok(());
            }
            if playlist.len() < count as usize {
                log::warn!("Drew only {} of {} requested songs", playlist.len(), count);
            }

            match &output {
                Some(path) => {
                    write_m3u(&playlist, path).context("Failed to write playlist")?;
                    println!("Wrote {} songs to {}", playlist.len(), path.display());
                }
                None => {
                    for (i, entry) in playlist.iter().enumerate() {
                        println!("{:>4}. {} - {}", i + 1, entry.artist, entry.title);
                    }
                }
            }

            if dry_run {
                println!("(dry run — repeat counts not saved)");
            } else {
                rotor::store::save(&library, &library_path)
                    .context("Failed to save library")?;
            }
        }

        Commands::Songs { category, priority } => {
            let library = load(&library_path)?;

            if let Some(ref name) = category {
                if !library.categories.contains_key(name) {
                    println!("No category named \"{name}\".");
                    return Ok(());
                }
            }

            let rows: Vec<(&str, &rotor::library::Song)> = library
                .categories
                .iter()
                .filter(|(name, _)| category.as_deref().is_none_or(|c| c == name.as_str()))
                .flat_map(|(name, songs)| songs.iter().map(move |s| (name.as_str(), s)))
                .filter(|(_, s)| priority.is_none_or(|p| s.priority == p))
                .collect();

            if rows.is_empty() {
                println!("No songs match.");
                return Ok(());
            }

            println!(
                "{:<15} {:<20} {:<30} {:>8} {:>7}",
                "Category", "Artist", "Title", "Priority", "Repeats"
            );
            println!("{}", "-".repeat(84));
            for (name, song) in rows {
                println!(
                    "{:<15} {:<20} {:<30} {:>8} {:>7}",
                    truncate(name, 15),
                    truncate(&song.artist, 20),
                    truncate(&song.title, 30),
                    song.priority,
                    song.repeat_count,
                );
            }
        }

        Commands::SetPriority { category, artist, title, priority } => {
            let mut library = load(&library_path)?;
            let updated = library
                .set_priority(&category, &artist, &title, priority)
                .context("Failed to set priority")?;
            rotor::store::save(&library, &library_path).context("Failed to save library")?;
            println!("Set priority {priority} on {updated} song(s).");
        }

        Commands::SetWeight { priority, weight } => {
            let mut library = load(&library_path)?;
            library
                .set_weight(priority, weight)
                .context("Failed to set weight")?;
            rotor::store::save(&library, &library_path).context("Failed to save library")?;
            println!("Set weight {weight} on priority {priority}.");
        }

        Commands::Weights => {
            let library = load(&library_path)?;
            let counts = library.tier_counts();

            println!("{:>8} {:>7} {:>6}  {}", "Priority", "Weight", "Songs", "Eligible");
            println!("{}", "-".repeat(35));
            for (p, (&weight, &count)) in library.weights.iter().zip(&counts).enumerate() {
                let eligible = if weight > 0 && count > 0 { "yes" } else { "no" };
                println!("{p:>8} {weight:>7} {count:>6}  {eligible}");
            }
        }

        Commands::Frequency { count } => {
            let library = load(&library_path)?;
            let frequencies = rotor::frequency::expected_frequency(&library, count);

            println!("Expected playlists between repeats (playlist length {count}):");
            println!();
            println!("{:>8} {:>7} {:>6} {:>12}", "Priority", "Weight", "Songs", "Playlists");
            println!("{}", "-".repeat(37));
            let counts = library.tier_counts();
            for (p, freq) in frequencies.iter().enumerate() {
                let shown = match freq {
                    Some(f) => format!("{f:.1}"),
                    None => "--".to_string(),
                };
                println!(
                    "{p:>8} {:>7} {:>6} {shown:>12}",
                    library.weights[p], counts[p]
                );
            }
        }

        Commands::ResetCounts => {
            let mut library = load(&library_path)?;
            library.reset_repeat_counts();
            rotor::store::save(&library, &library_path).context("Failed to save library")?;
            println!("Reset repeat counts on {} songs.", library.song_count());
        }

        Commands::Stats => {
            let library = load(&library_path)?;
            let counts = library.tier_counts();
            let weighted = library.weights.iter().filter(|&&w| w > 0).count();
            let eligible = library
                .weights
                .iter()
                .zip(&counts)
                .filter(|&(&w, &n)| w > 0 && n > 0)
                .count();

            println!("Library Statistics");
            println!("==================");
            println!("Categories:      {}", library.categories.len());
            println!("Songs:           {}", library.song_count());
            println!("Priority tiers:  {}", library.weights.len());
            println!("Weighted tiers:  {weighted}");
            println!("Eligible tiers:  {eligible}");
            println!();

            println!("Per category:");
            for (name, songs) in &library.categories {
                println!("  {:<20} {}", name, songs.len());
            }
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Library> {
    rotor::store::load(path)
        .with_context(|| format!("Failed to load library {}", path.display()))
}

fn resolve_music_dir(
    cli_path: Option<PathBuf>,
    config: &rotor::config::AppConfig,
) -> Result<PathBuf> {
    cli_path.or_else(|| config.music_dir.clone()).ok_or_else(|| {
        anyhow::anyhow!("No directory to scan. Pass a path or set music_dir in config.")
    })
}

/// Write an extended M3U file: one `#EXTINF` line per song, then its location.
fn write_m3u(playlist: &[PlaylistEntry], path: &Path) -> std::io::Result<()> {
    let mut out = std::fs::File::create(path)?;
    writeln!(out, "#EXTM3U")?;
    for entry in playlist {
        writeln!(out, "#EXTINF:-1,{} - {}", entry.artist, entry.title)?;
        writeln!(out, "{}", entry.location.display())?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}
