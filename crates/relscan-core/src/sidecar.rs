//! Digest sidecar files: `<file>.<algorithm>.txt` next to each release file.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::digest::{DigestAlgorithm, FileDigests};

/// Path of the sidecar for `path` and `algorithm`, e.g. `app.zip.sha256.txt`.
pub fn sidecar_path(path: &Path, algorithm: DigestAlgorithm) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(format!(".{}.txt", algorithm.name()));
    path.with_file_name(name)
}

/// Name of the file `file_name` would be the sidecar of, if it carries a sidecar suffix.
/// `app.zip.md5.txt` gives `app.zip`.
pub fn sidecar_source_name(file_name: &str) -> Option<&str> {
    DigestAlgorithm::ALL.iter().find_map(|alg| {
        file_name
            .strip_suffix(&format!(".{}.txt", alg.name()))
            .filter(|source| !source.is_empty())
    })
}

/// Write one sidecar per algorithm, replacing existing content.
/// Content is the bare lowercase hex digest without a trailing newline.
pub fn write_sidecars(path: &Path, digests: &FileDigests) -> Result<()> {
    for alg in DigestAlgorithm::ALL {
        let target = sidecar_path(path, alg);
        fs::write(&target, digests.get(alg))
            .with_context(|| format!("write {}", target.display()))?;
        tracing::debug!(file = %path.display(), %alg, "wrote {}", target.display());
    }
    Ok(())
}
