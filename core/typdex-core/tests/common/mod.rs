//! Hand-assembled sfnt fixtures: just enough of a font to exercise the
//! name-table extraction and loader paths without shipping binary blobs.

#![allow(dead_code)]

use typdex_core::progress::Progress;

/// OpenType name IDs used by fixtures.
pub const FAMILY: u16 = 1;
pub const SUBFAMILY: u16 = 2;
pub const FULL_NAME: u16 = 4;
pub const POSTSCRIPT: u16 = 6;
pub const TYPOGRAPHIC_FAMILY: u16 = 16;
pub const TYPOGRAPHIC_SUBFAMILY: u16 = 17;
pub const COMPATIBLE_FULL: u16 = 18;
pub const WWS_SUBFAMILY: u16 = 22;

/// Minimal single-font sfnt carrying only a `name` table.
pub fn build_font(names: &[(u16, &str)]) -> Vec<u8> {
    build_font_with(names, None, None)
}

/// Single-font sfnt with optional OS/2 weight/width and post italic angle.
pub fn build_font_with(
    names: &[(u16, &str)],
    weight_width: Option<(u16, u16)>,
    italic_angle: Option<f64>,
) -> Vec<u8> {
    let mut tables: Vec<([u8; 4], Vec<u8>)> = Vec::new();
    if let Some((weight, width)) = weight_width {
        tables.push((*b"OS/2", build_os2(weight, width)));
    }
    tables.push((*b"name", build_name_table(names)));
    if let Some(angle) = italic_angle {
        tables.push((*b"post", build_post(angle)));
    }
    tables.sort_by_key(|(tag, _)| *tag);
    assemble_sfnt(&tables)
}

/// TTC container bundling one single-table font per face.
pub fn build_collection(faces: &[&[(u16, &str)]]) -> Vec<u8> {
    let fonts: Vec<Vec<u8>> = faces.iter().map(|names| build_font(names)).collect();

    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(fonts.len() as u32).to_be_bytes());

    let mut next = (12 + 4 * fonts.len()) as u32;
    let mut starts = Vec::new();
    for font in &fonts {
        starts.push(next);
        next += font.len() as u32;
    }
    for start in &starts {
        out.extend_from_slice(&start.to_be_bytes());
    }

    for (font, start) in fonts.iter().zip(&starts) {
        // Table record offsets inside a collection are absolute file
        // offsets; rebase each embedded directory.
        let mut rebased = font.clone();
        let num_tables = u16::from_be_bytes([font[4], font[5]]) as usize;
        for i in 0..num_tables {
            let rec = 12 + 16 * i;
            let off = u32::from_be_bytes([
                font[rec + 8],
                font[rec + 9],
                font[rec + 10],
                font[rec + 11],
            ]);
            rebased[rec + 8..rec + 12].copy_from_slice(&(off + start).to_be_bytes());
        }
        out.extend_from_slice(&rebased);
    }
    out
}

/// `name` table with Windows platform (3), Unicode BMP encoding (1),
/// US-English (0x0409) records.
pub fn build_name_table(names: &[(u16, &str)]) -> Vec<u8> {
    let mut sorted: Vec<(u16, &str)> = names.to_vec();
    sorted.sort_by_key(|(id, _)| *id);

    let mut storage: Vec<u8> = Vec::new();
    let mut records: Vec<u8> = Vec::new();
    for (name_id, value) in &sorted {
        let start = storage.len() as u16;
        for unit in value.encode_utf16() {
            storage.extend_from_slice(&unit.to_be_bytes());
        }
        let length = storage.len() as u16 - start;
        for field in [3u16, 1, 0x0409, *name_id, length, start] {
            records.extend_from_slice(&field.to_be_bytes());
        }
    }

    let count = sorted.len() as u16;
    let mut table = Vec::new();
    table.extend_from_slice(&0u16.to_be_bytes());
    table.extend_from_slice(&count.to_be_bytes());
    table.extend_from_slice(&(6 + count * 12).to_be_bytes());
    table.extend_from_slice(&records);
    table.extend_from_slice(&storage);
    table
}

fn assemble_sfnt(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let num = tables.len() as u16;
    let mut search_range: u16 = 1;
    while search_range * 2 <= num {
        search_range *= 2;
    }
    let entry_selector = search_range.trailing_zeros() as u16;
    let search_range = search_range * 16;

    let mut font = Vec::new();
    font.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    font.extend_from_slice(&num.to_be_bytes());
    font.extend_from_slice(&search_range.to_be_bytes());
    font.extend_from_slice(&entry_selector.to_be_bytes());
    font.extend_from_slice(&(num * 16 - search_range).to_be_bytes());

    let mut offset = 12 + 16 * tables.len() as u32;
    let mut data = Vec::new();
    for (tag, bytes) in tables {
        font.extend_from_slice(tag);
        font.extend_from_slice(&0u32.to_be_bytes());
        font.extend_from_slice(&offset.to_be_bytes());
        font.extend_from_slice(&(bytes.len() as u32).to_be_bytes());

        let mut padded = bytes.clone();
        while padded.len() % 4 != 0 {
            padded.push(0);
        }
        offset += padded.len() as u32;
        data.extend_from_slice(&padded);
    }
    font.extend_from_slice(&data);
    font
}

/// OS/2 version 0 (78 bytes), zero-filled apart from weight and width class.
fn build_os2(weight: u16, width: u16) -> Vec<u8> {
    let mut table = vec![0u8; 78];
    table[4..6].copy_from_slice(&weight.to_be_bytes());
    table[6..8].copy_from_slice(&width.to_be_bytes());
    table
}

/// post version 3.0 (32 bytes) with the given italic angle.
fn build_post(angle: f64) -> Vec<u8> {
    let mut table = vec![0u8; 32];
    table[0..4].copy_from_slice(&0x0003_0000u32.to_be_bytes());
    let fixed = (angle * 65536.0).round() as i32;
    table[4..8].copy_from_slice(&fixed.to_be_bytes());
    table
}

/// Progress sink that records every `(current, total)` tick.
#[derive(Debug, Default)]
pub struct CountingProgress(pub Vec<(usize, usize)>);

impl Progress for CountingProgress {
    fn update(&mut self, current: usize, total: usize) {
        self.0.push((current, total));
    }
}
