//! Streaming output helpers (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::db::MappingId;
use crate::extract::FaceRecord;

/// One resolved face together with its stable mapping ID.
#[derive(Debug, Clone, Serialize)]
pub struct FaceHit<'a> {
    pub id: MappingId,
    #[serde(flatten)]
    pub record: &'a FaceRecord,
}

/// Pair lookup results with their IDs for serialization.
pub fn hits<'a>(entries: &[(MappingId, &'a FaceRecord)]) -> Vec<FaceHit<'a>> {
    entries
        .iter()
        .map(|(id, record)| FaceHit { id: *id, record })
        .collect()
}

/// Write results as a prettified JSON array.
pub fn write_json_pretty(results: &[FaceHit], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    w.write_all(json.as_bytes())?;
    Ok(())
}

/// Write results as newline-delimited JSON (NDJSON).
pub fn write_ndjson(results: &[FaceHit], mut w: impl Write) -> Result<()> {
    for item in results {
        let line = serde_json::to_string(item)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{FaceNames, FaceRecord};

    fn sample_record() -> FaceRecord {
        FaceRecord {
            fontname: Some("Alpha-Regular".to_string()),
            filename: "alpha-regular.otf".to_string(),
            names: FaceNames {
                family: Some("Alpha".to_string()),
                subfamily: Some("Regular".to_string()),
                ..FaceNames::default()
            },
            ..FaceRecord::default()
        }
    }

    #[test]
    fn ndjson_writes_one_line_per_hit() {
        let record = sample_record();
        let entries = [(1, &record), (2, &record)];
        let mut buf = Vec::new();

        write_ndjson(&hits(&entries), &mut buf).expect("write ndjson");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).expect("parse");
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["filename"], "alpha-regular.otf");
        assert_eq!(parsed["names"]["family"], "Alpha");
    }

    #[test]
    fn absent_fields_stay_out_of_the_json() {
        let record = sample_record();
        let entries = [(1, &record)];
        let mut buf = Vec::new();

        write_json_pretty(&hits(&entries), &mut buf).expect("write json");

        let text = String::from_utf8(buf).expect("utf8");
        assert!(!text.contains("\"size\""));
        assert!(!text.contains("\"weight\""));
    }
}
