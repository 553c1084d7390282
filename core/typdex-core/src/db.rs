//! The font name database (made by FontLab https://www.fontlab.com/)

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::FaceRecord;

/// Database schema version; a persisted database carrying any other value is
/// rebuilt from scratch on the next update.
pub const FORMAT_VERSION: u32 = 2;

/// Stable 1-based position of a face record in the mapping sequence. IDs are
/// never reused or reordered within a database lifetime.
pub type MappingId = u32;

/// Root aggregate: every indexed face, the family index over them, and the
/// content-checksum cache used for change detection. Created or loaded once
/// per update run, mutated in place by every scan, and handed back to the
/// caller for persistence — this crate never persists it itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontDatabase {
    pub version: u32,
    /// Append-only face records; 1-based position is the mapping ID.
    pub mappings: Vec<FaceRecord>,
    /// Family name to mapping IDs (a family holds its regular, bold, italic
    /// and further faces).
    pub families: BTreeMap<String, Vec<MappingId>>,
    /// Hex content checksum to the file path last associated with it. Pure
    /// change-detection cache, never used for lookup.
    pub checksums: BTreeMap<String, String>,
}

impl FontDatabase {
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            ..Self::default()
        }
    }

    pub fn is_current_version(&self) -> bool {
        self.version == FORMAT_VERSION
    }

    /// Append a face record, returning its permanent mapping ID. A record
    /// with a resolved family name is indexed into the family bucket; the
    /// rest stay in `mappings` but are unreachable by family lookup.
    pub fn insert(&mut self, record: FaceRecord) -> MappingId {
        let family = record.names.family.clone();
        self.mappings.push(record);
        let id = self.mappings.len() as MappingId;

        match family {
            Some(family) => self.families.entry(family).or_default().push(id),
            None => debug!(id, "face has no resolvable family name, left unindexed"),
        }
        id
    }

    /// Face record for a 1-based mapping ID.
    pub fn record(&self, id: MappingId) -> Option<&FaceRecord> {
        if id == 0 {
            return None;
        }
        self.mappings.get(id as usize - 1)
    }

    /// Mapping IDs for a family: the exact bucket when it exists, else the
    /// first bucket matching case-insensitively.
    pub fn family(&self, name: &str) -> &[MappingId] {
        if let Some(ids) = self.families.get(name) {
            return ids;
        }
        self.families
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, ids)| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve a human-readable name to a single face. Matches the preferred
    /// full name, the PostScript name and the legacy identifiers first, then
    /// falls back to `"family subfamily"`. The lowest mapping ID wins, which
    /// is stable because mappings are append-only.
    pub fn resolve(&self, name: &str) -> Option<(MappingId, &FaceRecord)> {
        self.entries()
            .find(|(_, record)| direct_names(record).any(|n| n.eq_ignore_ascii_case(name)))
            .or_else(|| {
                self.entries().find(|(_, record)| {
                    match (&record.names.family, &record.names.subfamily) {
                        (Some(family), Some(sub)) => {
                            format!("{family} {sub}").eq_ignore_ascii_case(name)
                        }
                        _ => false,
                    }
                })
            })
    }

    /// All faces whose names match any of the patterns, in mapping order.
    pub fn find<'a>(&'a self, patterns: &[Regex]) -> Vec<(MappingId, &'a FaceRecord)> {
        self.entries()
            .filter(|(_, record)| {
                all_names(record).any(|n| patterns.iter().any(|re| re.is_match(n)))
            })
            .collect()
    }

    /// Every face with its mapping ID, in mapping order.
    pub fn all(&self) -> Vec<(MappingId, &FaceRecord)> {
        self.entries().collect()
    }

    fn entries(&self) -> impl Iterator<Item = (MappingId, &FaceRecord)> {
        self.mappings
            .iter()
            .enumerate()
            .map(|(idx, record)| (idx as MappingId + 1, record))
    }
}

/// Names a face answers to directly (no family+subfamily composition).
fn direct_names(record: &FaceRecord) -> impl Iterator<Item = &str> {
    [
        record.names.fullname.as_deref(),
        record.names.psname.as_deref(),
        record.fullname.as_deref(),
        record.fontname.as_deref(),
    ]
    .into_iter()
    .flatten()
}

fn all_names(record: &FaceRecord) -> impl Iterator<Item = &str> {
    [
        record.names.fullname.as_deref(),
        record.names.family.as_deref(),
        record.names.subfamily.as_deref(),
        record.names.psname.as_deref(),
        record.fullname.as_deref(),
        record.familyname.as_deref(),
        record.fontname.as_deref(),
    ]
    .into_iter()
    .flatten()
}
