//! Source-file collection.
//!
//! Walks the configured source directories for `.res`/`.resi` files and
//! scans them in parallel. When a signature and an implementation exist for
//! the same module key (path minus extension), the signature wins and the
//! implementation is discarded.

use std::{
    collections::btree_map::{BTreeMap, Entry},
    fs,
    path::PathBuf,
};

use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

use crate::core::externals::{ExternalDecl, scan_externals};

/// Externals from every module file, plus per-file read failures.
#[derive(Debug)]
pub struct CollectedExternals {
    /// Declarations in module-key order, intra-file textual order preserved.
    pub decls: Vec<ExternalDecl>,
    pub files_scanned: usize,
    pub read_errors: Vec<(PathBuf, String)>,
}

fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    name != "node_modules" && !name.starts_with('.')
}

/// Resolve the module files to scan. Hidden entries and `node_modules` are
/// pruned; a configured directory that does not exist contributes zero files.
pub fn resolve_module_files(source_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut by_module: BTreeMap<String, PathBuf> = BTreeMap::new();
    for dir in source_dirs {
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_entry(keep_entry)
            .flatten()
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if ext != "res" && ext != "resi" {
                continue;
            }
            let key = path.with_extension("").to_string_lossy().into_owned();
            match by_module.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(path.to_path_buf());
                }
                Entry::Occupied(mut slot) => {
                    // Signature-wins precedence.
                    if ext == "resi" {
                        slot.insert(path.to_path_buf());
                    }
                }
            }
        }
    }
    by_module.into_values().collect()
}

/// Read and scan every module file. Files are processed in parallel; the
/// result order is deterministic (module-key order).
pub fn collect_external_decls(source_dirs: &[PathBuf]) -> CollectedExternals {
    let files = resolve_module_files(source_dirs);
    let results: Vec<Result<Vec<ExternalDecl>, (PathBuf, String)>> = files
        .par_iter()
        .map(|path| match fs::read_to_string(path) {
            Ok(text) => Ok(scan_externals(&text, &path.to_string_lossy())),
            Err(err) => Err((path.clone(), err.to_string())),
        })
        .collect();

    let mut decls = Vec::new();
    let mut read_errors = Vec::new();
    for result in results {
        match result {
            Ok(found) => decls.extend(found),
            Err(err) => read_errors.push(err),
        }
    }

    CollectedExternals {
        decls,
        files_scanned: files.len(),
        read_errors,
    }
}
