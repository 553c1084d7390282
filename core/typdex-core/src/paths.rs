//! Filesystem path normalization (made by FontLab https://www.fontlab.com/)

use serde::{Deserialize, Serialize};

/// Host path conventions, decided once at startup and threaded through as
/// configuration rather than re-derived per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OsFamily {
    Unix,
    Windows,
    /// A Unix-like compatibility layer over Windows (Cygwin, MSYS), where
    /// drive letters hide behind a `/cygdrive/<letter>/` mount prefix.
    CygwinLike,
}

impl OsFamily {
    /// Separator used by directory-list environment variables.
    pub fn list_separator(self) -> char {
        match self {
            OsFamily::Windows => ';',
            _ => ':',
        }
    }

    fn case_insensitive(self) -> bool {
        !matches!(self, OsFamily::Unix)
    }
}

/// Canonicalize a path string so checksum and index keys stay stable across
/// platform separator and drive-letter conventions.
///
/// On non-POSIX conventions backslashes become forward slashes and the whole
/// string is lower-cased (font paths are case-insensitive there). `.` and
/// `..` segments collapse lexically, without touching the filesystem, so a
/// nonexistent path passes through cleaned rather than erroring. Idempotent.
pub fn normalize(raw: &str, os: OsFamily) -> String {
    let mut path = raw.to_string();
    if os.case_insensitive() {
        path = path.replace('\\', "/").to_lowercase();
    }
    let mut collapsed = collapse_dots(&path);
    if os == OsFamily::CygwinLike {
        collapsed = rewrite_cygdrive(&collapsed);
    }
    collapsed
}

fn collapse_dots(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                if matches!(parts.last(), Some(&last) if last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

fn rewrite_cygdrive(path: &str) -> String {
    let rest = match path.strip_prefix("/cygdrive/") {
        Some(rest) => rest,
        None => return path.to_string(),
    };

    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some('/')) if drive.is_ascii_alphabetic() => {
            format!("{drive}:{}", &rest[1..])
        }
        (Some(drive), None) if drive.is_ascii_alphabetic() => format!("{drive}:"),
        _ => path.to_string(),
    }
}
