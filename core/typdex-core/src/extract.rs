//! Font metadata extraction (made by FontLab https://www.fontlab.com/)

use std::path::Path;

use read_fonts::tables::layout::FeatureParams;
use read_fonts::types::Tag;
use read_fonts::{FileRef, FontRef, TableProvider};
use serde::{Deserialize, Serialize};
use skrifa::string::StringId;
use skrifa::{FontRef as SkrifaFontRef, MetadataProvider};
use tracing::trace;

/// Preferred-tier identifiers from the rich `name` table. Each field falls
/// back independently to its legacy equivalent and stays absent when neither
/// resolves; a record with no resolvable `family` is never family-indexed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceNames {
    /// Compatible full name when present, else the full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    /// Typographic family when present, else the family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// WWS subfamily (the style override), else the typographic subfamily,
    /// else the subfamily.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfamily: Option<String>,
    /// PostScript name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psname: Option<String>,
}

/// Optical design size from the GPOS `size` feature, in decipoints. Slots
/// are present only when non-zero; an all-zero feature yields no `DesignSize`
/// at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignSize {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_size: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_top: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_bottom: Option<u16>,
}

impl DesignSize {
    fn from_params(design_size: u16, range_bottom: u16, range_top: u16) -> Option<Self> {
        let entry = |value: u16| (value != 0).then_some(value);
        let size = DesignSize {
            design_size: entry(design_size),
            range_top: entry(range_top),
            range_bottom: entry(range_bottom),
        };
        (size != DesignSize::default()).then_some(size)
    }
}

/// One indexed font face: one name/style combination within a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    /// Legacy-tier PostScript name (name ID 6).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fontname: Option<String>,
    /// Legacy-tier full name (name ID 4).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    /// Legacy-tier family name (name ID 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub familyname: Option<String>,
    /// Normalized path, or basename only for managed-tree files.
    pub filename: String,
    #[serde(default)]
    pub names: FaceNames,
    /// OS/2 usWeightClass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    /// OS/2 usWidthClass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    /// post table italic angle, degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slant: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<DesignSize>,
}

/// Number of faces carried by a font file: 1 for a single font, the
/// collection length for TTC/OTC containers, 0 when the data is unparsable.
pub fn face_count(data: &[u8]) -> usize {
    match FileRef::new(data) {
        Ok(FileRef::Font(_)) => 1,
        Ok(FileRef::Collection(collection)) => collection.len() as usize,
        Err(_) => 0,
    }
}

/// Extract one normalized face record, `index` selecting the face inside a
/// collection. `None` means the face is unextractable; partial metadata
/// produces a degraded record, not a failure.
pub fn extract_face(data: &[u8], index: Option<u32>, path: &Path) -> Option<FaceRecord> {
    let face_index = index.unwrap_or(0);
    let font = FontRef::from_index(data, face_index).ok()?;
    let skrifa_font = SkrifaFontRef::from_index(data, face_index).ok()?;

    let string = |id: StringId| english_name(&skrifa_font, id);

    let fontname = string(StringId::POSTSCRIPT_NAME);
    let fullname = string(StringId::FULL_NAME);
    let familyname = string(StringId::FAMILY_NAME);

    let names = FaceNames {
        fullname: string(StringId::COMPATIBLE_FULL_NAME).or_else(|| fullname.clone()),
        family: string(StringId::TYPOGRAPHIC_FAMILY_NAME).or_else(|| familyname.clone()),
        subfamily: string(StringId::WWS_SUBFAMILY_NAME)
            .or_else(|| string(StringId::TYPOGRAPHIC_SUBFAMILY_NAME))
            .or_else(|| string(StringId::SUBFAMILY_NAME)),
        psname: fontname.clone(),
    };

    let (weight, width) = classification(&font);

    trace!(path = %path.display(), index = face_index, "extracted face");

    Some(FaceRecord {
        fontname,
        fullname,
        familyname,
        filename: path.display().to_string(),
        names,
        weight,
        width,
        slant: italic_angle(&font),
        size: design_size(&font),
    })
}

/// US-English entry for a name ID, falling back to the first entry of any
/// language; empty and whitespace-only strings count as absent.
fn english_name(font: &SkrifaFontRef, id: StringId) -> Option<String> {
    let value = font.localized_strings(id).english_or_first()?.to_string();
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn classification(font: &FontRef) -> (Option<u16>, Option<u16>) {
    match font.os2() {
        Ok(table) => (Some(table.us_weight_class()), Some(table.us_width_class())),
        Err(_) => (None, None),
    }
}

fn italic_angle(font: &FontRef) -> Option<f64> {
    font.post().ok().map(|post| post.italic_angle().to_f64())
}

fn design_size(font: &FontRef) -> Option<DesignSize> {
    let gpos = font.gpos().ok()?;
    let list = gpos.feature_list().ok()?;
    let size_tag = Tag::new(b"size");

    for record in list.feature_records() {
        if record.feature_tag() != size_tag {
            continue;
        }
        let feature = record.feature(list.offset_data()).ok()?;
        if let Some(Ok(FeatureParams::Size(params))) = feature.feature_params() {
            return DesignSize::from_params(
                params.design_size(),
                params.range_start(),
                params.range_end(),
            );
        }
    }
    None
}
