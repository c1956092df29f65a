//! Project discovery: locate `rescript.json` and resolve source directories.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use walkdir::WalkDir;

pub const CONFIG_FILE_NAME: &str = "rescript.json";
/// Accepted for projects that have not migrated off the old name.
pub const LEGACY_CONFIG_FILE_NAME: &str = "bsconfig.json";

/// Resolved project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescriptConfig {
    pub root_dir: PathBuf,
    pub config_path: PathBuf,
    /// Ordered, deduplicated source directories.
    pub source_dirs: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RescriptJson {
    #[serde(default)]
    sources: Option<Sources>,
}

/// `sources` accepts a bare string, a single object, or an array of either.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Sources {
    One(SourceEntry),
    Many(Vec<SourceEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SourceEntry {
    Dir(String),
    Detailed(DetailedSource),
}

#[derive(Debug, Deserialize)]
struct DetailedSource {
    /// Entries without a `dir` are skipped.
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    subdirs: Option<Subdirs>,
}

/// `subdirs: true` and `subdirs: "recurse"` both mean recursive.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Subdirs {
    Flag(bool),
    Mode(String),
}

impl Subdirs {
    fn recurse(&self) -> bool {
        match self {
            Subdirs::Flag(flag) => *flag,
            Subdirs::Mode(mode) => mode == "recurse",
        }
    }
}

/// Walk up from `start_dir` until a config file is found. Returns `Ok(None)`
/// when no ancestor carries one.
pub fn find_rescript_config(start_dir: &Path) -> Result<Option<RescriptConfig>> {
    let mut current = fs::canonicalize(start_dir)
        .with_context(|| format!("Invalid directory: {}", start_dir.display()))?;

    loop {
        for name in [CONFIG_FILE_NAME, LEGACY_CONFIG_FILE_NAME] {
            let candidate = current.join(name);
            if candidate.is_file() {
                let source_dirs = read_source_dirs(&candidate, &current)?;
                return Ok(Some(RescriptConfig {
                    root_dir: current,
                    config_path: candidate,
                    source_dirs,
                }));
            }
        }
        if !current.pop() {
            return Ok(None);
        }
    }
}

fn read_source_dirs(config_path: &Path, root_dir: &Path) -> Result<Vec<PathBuf>> {
    let raw = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let json: RescriptJson = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    let entries = match json.sources {
        None => Vec::new(),
        Some(Sources::One(entry)) => vec![entry],
        Some(Sources::Many(entries)) => entries,
    };

    let mut dirs = Vec::new();
    let mut seen = HashSet::new();
    for entry in entries {
        let (dir, recurse) = match entry {
            SourceEntry::Dir(dir) => (dir, false),
            SourceEntry::Detailed(detailed) => {
                let Some(dir) = detailed.dir else { continue };
                let recurse = detailed
                    .subdirs
                    .map(|subdirs| subdirs.recurse())
                    .unwrap_or(false);
                (dir, recurse)
            }
        };
        let full = root_dir.join(&dir);
        if seen.insert(full.clone()) {
            dirs.push(full.clone());
        }
        if recurse {
            for sub in list_subdirs(&full) {
                if seen.insert(sub.clone()) {
                    dirs.push(sub);
                }
            }
        }
    }
    Ok(dirs)
}

fn list_subdirs(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            name != "node_modules" && !name.starts_with('.')
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect()
}
