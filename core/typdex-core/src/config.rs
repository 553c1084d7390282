//! Environment-derived configuration (made by FontLab https://www.fontlab.com/)

use std::env;

use crate::paths::{normalize, OsFamily};

/// Directory-list variables the managed font tree is resolved from, in scan
/// order.
const SEARCH_PATH_VARS: [&str; 2] = ["OPENTYPEFONTS", "TTFONTS"];

/// When set, the host already routes its fonts through the managed tree and
/// the OS font cache is not scanned separately.
const OS_FONT_DIR_VAR: &str = "OSFONTDIR";

/// Everything the update pipeline needs to know about its host, captured
/// once and passed by reference from then on.
#[derive(Debug, Clone)]
pub struct Config {
    pub os: OsFamily,
    /// Managed font tree directories, normalized, in scan order.
    pub search_dirs: Vec<String>,
    /// OS font directory override; its presence gates off host-cache
    /// scanning.
    pub os_font_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let os = detect_os_family();

        let mut search_dirs = Vec::new();
        for var in SEARCH_PATH_VARS {
            if let Ok(value) = env::var(var) {
                search_dirs.extend(split_path_list(&value, os));
            }
        }

        let os_font_dir = env::var(OS_FONT_DIR_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty());

        Self {
            os,
            search_dirs,
            os_font_dir,
        }
    }
}

/// Split a directory-list variable into normalized entries. Empty and `.`
/// entries are dropped here, at construction time, so downstream scanners
/// never see the implicit current directory.
pub fn split_path_list(value: &str, os: OsFamily) -> Vec<String> {
    value
        .split(os.list_separator())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| normalize(entry, os))
        .filter(|entry| entry != ".")
        .collect()
}

fn detect_os_family() -> OsFamily {
    if cfg!(windows) {
        return OsFamily::Windows;
    }
    for var in ["OSTYPE", "MSYSTEM"] {
        if let Ok(value) = env::var(var) {
            let value = value.to_ascii_lowercase();
            if value.contains("cygwin") || value.contains("msys") {
                return OsFamily::CygwinLike;
            }
        }
    }
    OsFamily::Unix
}
