//! Release directory listing and per-file digest processing.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::digest::{self, FileDigests};
use crate::sidecar;

/// One processed release file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    /// File name as shown in the summary.
    pub name: String,
    pub path: PathBuf,
    pub digests: FileDigests,
}

/// List the files to process, in processing order.
///
/// The listing is sorted by name, then reversed. Directories (including
/// symlinks to directories) are skipped, as are sidecars whose source file
/// is in the same listing. A file that only looks like a sidecar is kept.
pub fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let read = fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))?;
    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in read {
        let entry = entry.with_context(|| format!("list {}", dir.display()))?;
        let path = entry.path();
        let meta = fs::metadata(&path).with_context(|| format!("stat {}", path.display()))?;
        if meta.is_dir() {
            continue;
        }
        files.push((entry.file_name().to_string_lossy().into_owned(), path));
    }

    let names: HashSet<String> = files.iter().map(|(name, _)| name.clone()).collect();
    files.retain(|(name, _)| match sidecar::sidecar_source_name(name) {
        Some(source) => !names.contains(source),
        None => true,
    });

    files.sort_by(|a, b| a.1.file_name().cmp(&b.1.file_name()));
    files.reverse();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Digest one file and write its sidecars.
pub fn process_file(path: &Path) -> Result<ReleaseEntry> {
    let digests = digest::digest_path(path)?;
    sidecar::write_sidecars(path, &digests)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ReleaseEntry {
        name,
        path: path.to_path_buf(),
        digests,
    })
}

/// Process every file in `dir`, calling `on_entry` after each one.
///
/// Stops at the first failure; sidecars already written are left in place.
pub fn process_dir<F>(dir: &Path, mut on_entry: F) -> Result<Vec<ReleaseEntry>>
where
    F: FnMut(&ReleaseEntry) -> Result<()>,
{
    let files = list_entries(dir)?;
    tracing::info!("hashing {} file(s) in {}", files.len(), dir.display());
    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        let entry = process_file(&path)?;
        on_entry(&entry)?;
        entries.push(entry);
    }
    Ok(entries)
}
