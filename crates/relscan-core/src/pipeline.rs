//! End-to-end release run: submit the artifact, hash the release dir, print the summary.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::config::ReleaseConfig;
use crate::release::{self, ReleaseEntry};
use crate::summary;
use crate::virustotal::{gui_file_url, ArtifactScanner, ScanSubmission};

/// Everything a release run produced.
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    pub submission: ScanSubmission,
    /// GUI page for the uploaded artifact.
    pub report_url: String,
    /// Processed files, in processing order.
    pub entries: Vec<ReleaseEntry>,
}

/// Run the full release flow, writing Markdown to `out`.
///
/// The artifact is submitted first; if that fails nothing is hashed and no
/// sidecar is written.
pub fn run_release<S, W>(cfg: &ReleaseConfig, scanner: &S, out: &mut W) -> Result<ReleaseReport>
where
    S: ArtifactScanner + ?Sized,
    W: Write,
{
    let submission = match scanner.submit(&cfg.artifact_path) {
        Ok(submission) => submission,
        Err(err) => {
            tracing::error!(stage = ?err.stage(), "submission failed: {}", err);
            return Err(anyhow::Error::new(err).context("submit artifact to VirusTotal"));
        }
    };
    tracing::info!(
        sha256 = %submission.sha256(),
        "artifact {} submitted",
        cfg.artifact_path.display()
    );

    let entries = run_hashes(&cfg.release_dir, out)?;

    let report_url = gui_file_url(&cfg.gui_base_url, submission.sha256());
    summary::write_report_link(out, &report_url)?;
    out.flush()?;

    Ok(ReleaseReport {
        submission,
        report_url,
        entries,
    })
}

/// Hash every file in `release_dir`, write sidecars, and print the hashes section.
pub fn run_hashes<W: Write>(release_dir: &Path, out: &mut W) -> Result<Vec<ReleaseEntry>> {
    summary::write_hashes_heading(out)?;
    let entries = release::process_dir(release_dir, |entry| {
        summary::write_entry(&mut *out, entry).context("write summary")
    })?;
    tracing::info!("hashed {} file(s)", entries.len());
    Ok(entries)
}
