//! Minimal VirusTotal v3 response schemas for the upload and analysis calls.

use serde::Deserialize;

use super::error::{ScanError, ScanStage};
use crate::digest::{is_hex_digest, DigestAlgorithm};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    links: Links,
}

#[derive(Debug, Deserialize)]
struct Links {
    #[serde(rename = "self")]
    self_link: String,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    meta: AnalysisMeta,
    #[serde(default)]
    data: Option<AnalysisData>,
}

#[derive(Debug, Deserialize)]
struct AnalysisMeta {
    file_info: FileInfo,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    sha256: String,
    #[serde(default)]
    md5: Option<String>,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AnalysisData {
    #[serde(default)]
    attributes: Option<AnalysisAttributes>,
}

#[derive(Debug, Deserialize)]
struct AnalysisAttributes {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    stats: Option<AnalysisStats>,
}

/// Engine verdict counts of an analysis. Usually all zero while queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AnalysisStats {
    #[serde(default)]
    pub malicious: u64,
    #[serde(default)]
    pub suspicious: u64,
    #[serde(default)]
    pub undetected: u64,
    #[serde(default)]
    pub harmless: u64,
}

/// What we keep from the analysis report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Lowercase SHA-256 of the uploaded file as computed by the service.
    pub sha256: String,
    pub md5: Option<String>,
    pub size: Option<u64>,
    /// `queued`, `in-progress` or `completed`.
    pub status: Option<String>,
    pub stats: Option<AnalysisStats>,
}

/// Extract and validate `data.links.self` from the upload response.
pub(crate) fn parse_upload(body: &[u8]) -> Result<String, ScanError> {
    let resp: UploadResponse = serde_json::from_slice(body)
        .map_err(|e| ScanError::malformed(ScanStage::Upload, e.to_string()))?;
    let link = resp.data.links.self_link.trim();
    let parsed = url::Url::parse(link).map_err(|e| {
        ScanError::malformed(ScanStage::Upload, format!("invalid self link {:?}: {}", link, e))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ScanError::malformed(
            ScanStage::Upload,
            format!("unsupported self link scheme {:?}", parsed.scheme()),
        ));
    }
    Ok(parsed.to_string())
}

/// Extract `meta.file_info.sha256` (plus optional status fields) from the analysis report.
pub(crate) fn parse_report(body: &[u8]) -> Result<FileReport, ScanError> {
    let resp: AnalysisResponse = serde_json::from_slice(body)
        .map_err(|e| ScanError::malformed(ScanStage::Report, e.to_string()))?;
    let info = resp.meta.file_info;
    if !is_hex_digest(&info.sha256, DigestAlgorithm::Sha256) {
        return Err(ScanError::malformed(
            ScanStage::Report,
            format!("sha256 is not a hex digest: {:?}", info.sha256),
        ));
    }
    let attributes = resp.data.and_then(|d| d.attributes);
    let (status, stats) = match attributes {
        Some(a) => (a.status, a.stats),
        None => (None, None),
    };
    Ok(FileReport {
        sha256: info.sha256.to_ascii_lowercase(),
        md5: info.md5.map(|m| m.to_ascii_lowercase()),
        size: info.size,
        status,
        stats,
    })
}
