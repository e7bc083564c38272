//! VirusTotal submission: upload the artifact, then read its analysis report once.
//!
//! The protocol is two blocking calls against the v3 API:
//! 1. `POST <base>/files` (multipart, part `file`) returns `data.links.self`.
//! 2. `GET <self link>` returns `meta.file_info.sha256`.
//!
//! Both carry `accept: application/json` and `x-apikey`. There is no retry and
//! no waiting for the analysis to complete.

mod client;
mod error;
mod response;

pub use client::VirusTotalClient;
pub use error::{ScanError, ScanStage};
pub use response::{AnalysisStats, FileReport};

use std::path::Path;

/// Successful submission of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSubmission {
    /// Self-link returned by the upload.
    pub analysis_url: String,
    pub report: FileReport,
}

impl ScanSubmission {
    pub fn sha256(&self) -> &str {
        &self.report.sha256
    }
}

/// Submits an artifact for scanning. Implemented by [`VirusTotalClient`];
/// the pipeline only depends on this trait.
pub trait ArtifactScanner {
    fn submit(&self, artifact: &Path) -> Result<ScanSubmission, ScanError>;
}

/// Human-facing report page for a file digest.
pub fn gui_file_url(gui_base_url: &str, sha256: &str) -> String {
    format!("{}/gui/file/{}", gui_base_url.trim_end_matches('/'), sha256)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gui_file_url_trims_slash() {
        assert_eq!(
            gui_file_url("https://www.virustotal.com/", "abc"),
            "https://www.virustotal.com/gui/file/abc"
        );
        assert_eq!(
            gui_file_url("https://www.virustotal.com", "abc"),
            "https://www.virustotal.com/gui/file/abc"
        );
    }
}
