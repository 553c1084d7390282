//! Host font-cache enumeration (made by FontLab https://www.fontlab.com/)

use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::FontDatabase;
use crate::loader::load_font;
use crate::paths::normalize;
use crate::progress::Progress;
use crate::scan::extension_rank;

/// External tool enumerating the host font cache, one `path: path` record
/// per line.
const LISTER: &str = "fc-list";

/// Extract the path portion of one lister output line, keeping it only when
/// it carries a recognized font extension. Tolerates both the `path: ` and
/// the `path: path` line shapes.
pub fn parse_list_line(line: &str) -> Option<&str> {
    let path = match line.split_once(": ") {
        Some((head, _)) => head,
        None => line.trim_end().trim_end_matches(':'),
    };
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    extension_rank(Path::new(path)).map(|_| path)
}

/// Feed every font known to the host font cache into the database, with
/// per-entry progress. Returns the number of entries processed.
///
/// Skipped entirely when an OS font directory override is configured: those
/// fonts are already part of the managed tree scan. A missing or failing
/// lister is a logged soft failure, never fatal.
pub fn scan_os_fonts(db: &mut FontDatabase, config: &Config, progress: &mut dyn Progress) -> usize {
    if config.os_font_dir.is_some() {
        debug!("OS font directory override set, skipping host font cache");
        return 0;
    }

    let output = match Command::new(LISTER).args([":", "file"]).output() {
        Ok(output) => output,
        Err(err) => {
            warn!(lister = LISTER, %err, "host font lister unavailable");
            return 0;
        }
    };
    if !output.status.success() {
        warn!(lister = LISTER, status = %output.status, "host font lister failed");
        return 0;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let entries: Vec<String> = stdout
        .lines()
        .filter_map(parse_list_line)
        .map(|path| normalize(path, config.os))
        .collect();

    let total = entries.len();
    info!(count = total, "host font cache entries");
    for (current, path) in entries.iter().enumerate() {
        progress.update(current + 1, total);
        load_font(db, Path::new(path), false);
    }
    total
}
