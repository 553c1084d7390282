//! Single-file font loading and change detection (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::path::Path;

use tracing::{debug, trace, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::db::FontDatabase;
use crate::extract::{extract_face, face_count};

/// Load one font file into the database, appending a record per face.
/// Returns the number of faces appended.
///
/// The content checksum short-circuits files already indexed under the same
/// path, so reloading an unchanged file is a no-op. The checksum entry is
/// recorded only once at least one face extracts, keeping transient failures
/// retryable on the next run. `managed` marks files from the managed font
/// tree, whose records store the basename only so the database stays
/// relocatable across machine-specific prefixes.
///
/// Nothing here is fatal; every failure mode degrades to a logged skip.
pub fn load_font(db: &mut FontDatabase, path: &Path, managed: bool) -> usize {
    if path.as_os_str().is_empty() {
        return 0;
    }

    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), %err, "cannot read font file");
            return 0;
        }
    };

    let checksum = format!("{:016x}", xxh3_64(&data));
    let path_string = path.display().to_string();
    if db.checksums.get(&checksum).is_some_and(|seen| *seen == path_string) {
        trace!(path = %path_string, "unchanged, already indexed");
        return 0;
    }

    let count = face_count(&data);
    let mut records = Vec::with_capacity(count);
    for index in 0..count {
        let face_index = (count > 1).then_some(index as u32);
        match extract_face(&data, face_index, path) {
            Some(record) => records.push(record),
            None => warn!(path = %path_string, index, "face not extractable"),
        }
    }

    if records.is_empty() {
        warn!(path = %path_string, "font could not be loaded");
        return 0;
    }

    // A stale prior path sharing this checksum value is overwritten; the
    // checksum is content-derived, so the cache stays keyed by identity.
    db.checksums.insert(checksum, path_string);

    let added = records.len();
    for mut record in records {
        if managed {
            if let Some(basename) = path.file_name() {
                record.filename = basename.to_string_lossy().to_string();
            }
        }
        let id = db.insert(record);
        trace!(id, "face indexed");
    }

    debug!(path = %path.display(), added, "font loaded");
    added
}
