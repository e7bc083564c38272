//! Blocking VirusTotal v3 client built on libcurl easy handles.

use curl::easy::{Easy, Form, List};
use std::path::Path;
use std::time::Duration;

use super::error::{ScanError, ScanStage};
use super::response::{self, FileReport};
use super::{ArtifactScanner, ScanSubmission};
use crate::config::{ApiKey, ReleaseConfig};

const USER_AGENT: &str = concat!("relscan/", env!("CARGO_PKG_VERSION"));

/// Two-step client: multipart upload, then one GET of the returned analysis link.
#[derive(Debug, Clone)]
pub struct VirusTotalClient {
    api_base_url: String,
    api_key: ApiKey,
    connect_timeout: Option<Duration>,
}

impl VirusTotalClient {
    pub fn new(api_base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_key,
            connect_timeout: None,
        }
    }

    pub fn from_config(cfg: &ReleaseConfig) -> Self {
        let client = Self::new(cfg.api_base_url.clone(), cfg.api_key());
        match cfg.connect_timeout() {
            Some(timeout) => client.with_connect_timeout(timeout),
            None => client,
        }
    }

    /// Override libcurl's connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn upload_url(&self) -> String {
        format!("{}/files", self.api_base_url.trim_end_matches('/'))
    }

    /// Headers sent on both calls.
    fn headers(&self, stage: ScanStage) -> Result<List, ScanError> {
        let mut list = List::new();
        list.append("accept: application/json")
            .map_err(ScanError::curl(stage))?;
        // "Name:" with no value makes curl drop the header; "Name;" sends it empty.
        let key_header = if self.api_key.is_empty() {
            "x-apikey;".to_string()
        } else {
            format!("x-apikey: {}", self.api_key.expose().trim())
        };
        list.append(&key_header).map_err(ScanError::curl(stage))?;
        if stage == ScanStage::Upload {
            // No 100-continue round trip for the multipart body.
            list.append("Expect:").map_err(ScanError::curl(stage))?;
        }
        Ok(list)
    }

    fn easy(&self, url: &str, stage: ScanStage) -> Result<Easy, ScanError> {
        let mut easy = Easy::new();
        easy.url(url).map_err(ScanError::curl(stage))?;
        easy.useragent(USER_AGENT).map_err(ScanError::curl(stage))?;
        if let Some(timeout) = self.connect_timeout {
            easy.connect_timeout(timeout)
                .map_err(ScanError::curl(stage))?;
        }
        easy.http_headers(self.headers(stage)?)
            .map_err(ScanError::curl(stage))?;
        Ok(easy)
    }

    /// Upload `artifact` and return the analysis self-link.
    pub fn upload(&self, artifact: &Path) -> Result<String, ScanError> {
        let meta = std::fs::metadata(artifact).map_err(|source| ScanError::Artifact {
            path: artifact.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(ScanError::Artifact {
                path: artifact.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }
        if self.api_key.is_empty() {
            tracing::warn!("API key is empty; sending upload anyway");
        }

        let url = self.upload_url();
        tracing::info!(
            "uploading {} ({} bytes) to {}",
            artifact.display(),
            meta.len(),
            url
        );
        let mut easy = self.easy(&url, ScanStage::Upload)?;
        let mut form = Form::new();
        form.part("file").file(artifact).add()?;
        easy.httppost(form)
            .map_err(ScanError::curl(ScanStage::Upload))?;

        let body = perform(&mut easy, ScanStage::Upload)?;
        let link = response::parse_upload(&body)?;
        tracing::debug!("upload accepted, analysis at {}", link);
        Ok(link)
    }

    /// Fetch the analysis report once and extract the file digest.
    pub fn fetch_report(&self, analysis_url: &str) -> Result<FileReport, ScanError> {
        tracing::info!("fetching analysis report {}", analysis_url);
        let mut easy = self.easy(analysis_url, ScanStage::Report)?;
        easy.get(true).map_err(ScanError::curl(ScanStage::Report))?;
        let body = perform(&mut easy, ScanStage::Report)?;
        let report = response::parse_report(&body)?;
        tracing::info!(
            sha256 = %report.sha256,
            md5 = report.md5.as_deref().unwrap_or("-"),
            size = report.size.unwrap_or(0),
            status = report.status.as_deref().unwrap_or("unknown"),
            "analysis report received"
        );
        if let Some(stats) = report.stats {
            tracing::debug!(
                malicious = stats.malicious,
                suspicious = stats.suspicious,
                undetected = stats.undetected,
                harmless = stats.harmless,
                "analysis stats"
            );
        }
        Ok(report)
    }
}

impl ArtifactScanner for VirusTotalClient {
    fn submit(&self, artifact: &Path) -> Result<ScanSubmission, ScanError> {
        let analysis_url = self.upload(artifact)?;
        let report = self.fetch_report(&analysis_url)?;
        if let (Some(remote), Ok(meta)) = (report.size, std::fs::metadata(artifact)) {
            if remote != meta.len() {
                tracing::warn!(
                    "service reports {} bytes for {}, local file has {}",
                    remote,
                    artifact.display(),
                    meta.len()
                );
            }
        }
        Ok(ScanSubmission {
            analysis_url,
            report,
        })
    }
}

/// Run the transfer, collect the body, and reject non-2xx statuses.
fn perform(easy: &mut Easy, stage: ScanStage) -> Result<Vec<u8>, ScanError> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(ScanError::curl(stage))?;
        transfer.perform().map_err(ScanError::curl(stage))?;
    }

    let code = easy.response_code().map_err(ScanError::curl(stage))?;
    if !(200..300).contains(&code) {
        tracing::warn!(
            "{} returned HTTP {}: {}",
            stage,
            code,
            String::from_utf8_lossy(&body).chars().take(200).collect::<String>()
        );
        return Err(ScanError::Http { stage, code });
    }
    Ok(body)
}
