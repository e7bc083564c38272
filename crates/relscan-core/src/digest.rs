//! MD5 and SHA-256 digests of release files.
//!
//! Both digests are computed over the same in-memory buffer so they always
//! describe the same bytes, even if the file changes while we run.

use anyhow::{Context, Result};
use md5::Md5;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;

/// Hash algorithms we publish for every release file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 2] = [DigestAlgorithm::Md5, DigestAlgorithm::Sha256];

    /// Lowercase name used in sidecar filenames (`<file>.<name>.txt`).
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }

    /// Length of the hex rendering.
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Sha256 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase hex digests of one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub md5: String,
    pub sha256: String,
}

impl FileDigests {
    pub fn get(&self, algorithm: DigestAlgorithm) -> &str {
        match algorithm {
            DigestAlgorithm::Md5 => &self.md5,
            DigestAlgorithm::Sha256 => &self.sha256,
        }
    }
}

/// Compute both digests over `data`.
pub fn digest_bytes(data: &[u8]) -> FileDigests {
    FileDigests {
        md5: hex::encode(Md5::digest(data)),
        sha256: hex::encode(Sha256::digest(data)),
    }
}

/// Read the whole file into memory and digest it.
pub fn digest_path(path: &Path) -> Result<FileDigests> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(digest_bytes(&data))
}

/// True if `s` looks like a hex digest of the given algorithm (case-insensitive).
pub fn is_hex_digest(s: &str, algorithm: DigestAlgorithm) -> bool {
    s.len() == algorithm.hex_len() && s.bytes().all(|b| b.is_ascii_hexdigit())
}
