//! Directory and font-tree scanning (made by FontLab https://www.fontlab.com/)

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Config;
use crate::db::FontDatabase;
use crate::loader::load_font;
use crate::paths::{normalize, OsFamily};
use crate::progress::Progress;

/// Recognized font container extensions, in scan order.
pub const FONT_EXTENSIONS: [&str; 4] = ["otf", "ttf", "ttc", "dfont"];

/// Rank of a path's extension within [`FONT_EXTENSIONS`], case-insensitive.
pub fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    FONT_EXTENSIONS.iter().position(|known| *known == ext)
}

/// Scan one directory (single level, no recursion) for font files and load
/// each into the database. Returns the number of font files seen.
///
/// Unreadable entries such as broken symlinks are skipped silently; a
/// missing directory just scans as empty.
pub fn scan_dir(db: &mut FontDatabase, dir: &Path, managed: bool, os: OsFamily) -> usize {
    let mut found: Vec<(usize, String)> = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(rank) = extension_rank(entry.path()) {
            found.push((rank, normalize(&entry.path().to_string_lossy(), os)));
        }
    }

    // Extension rank first, then path, so mapping IDs are assigned in a
    // deterministic discovery order.
    found.sort();

    info!(dir = %dir.display(), count = found.len(), "font files found");
    for (_, path) in &found {
        load_font(db, Path::new(path), managed);
    }
    found.len()
}

/// Scan every configured font-tree directory in order, skipping directories
/// already visited in this run, with per-directory progress. Returns the
/// number of font files seen.
pub fn scan_tree(db: &mut FontDatabase, config: &Config, progress: &mut dyn Progress) -> usize {
    let total = config.search_dirs.len();
    let mut visited: HashSet<String> = HashSet::new();
    let mut seen = 0;

    for (current, dir) in config.search_dirs.iter().enumerate() {
        progress.update(current + 1, total);
        if !visited.insert(normalize(dir, config.os)) {
            debug!(%dir, "directory already scanned");
            continue;
        }
        seen += scan_dir(db, Path::new(dir), true, config.os);
    }
    seen
}
