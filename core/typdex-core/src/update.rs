//! Database update orchestration (made by FontLab https://www.fontlab.com/)

use tracing::{debug, info};

use crate::config::Config;
use crate::db::{FontDatabase, FORMAT_VERSION};
use crate::oslist::scan_os_fonts;
use crate::progress::Progress;
use crate::scan::scan_tree;

/// Rebuild or incrementally update the font name database.
///
/// A missing, forced, or version-mismatched database starts from scratch;
/// otherwise the given database is merged into, with unchanged files
/// short-circuited by their content checksums. The managed font tree is
/// scanned first, then the host font cache. The caller persists the result.
pub fn update(
    db: Option<FontDatabase>,
    force: bool,
    config: &Config,
    progress: &mut dyn Progress,
) -> FontDatabase {
    let mut db = match db {
        Some(db) if !force && db.is_current_version() => {
            debug!(faces = db.mappings.len(), "reusing existing database");
            db
        }
        Some(db) => {
            info!(
                version = db.version,
                current = FORMAT_VERSION,
                "rebuilding font database from scratch"
            );
            FontDatabase::new()
        }
        None => FontDatabase::new(),
    };

    let tree_files = scan_tree(&mut db, config, progress);
    let os_files = scan_os_fonts(&mut db, config, progress);
    info!(
        tree_files,
        os_files,
        faces = db.mappings.len(),
        families = db.families.len(),
        "font database updated"
    );
    db
}
