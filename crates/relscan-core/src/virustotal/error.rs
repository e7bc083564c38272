//! Submission error type.

use std::fmt;
use std::path::PathBuf;

/// Which of the two API calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    /// `POST /files` multipart upload.
    Upload,
    /// `GET` of the self-link returned by the upload.
    Report,
}

impl fmt::Display for ScanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStage::Upload => f.write_str("upload"),
            ScanStage::Report => f.write_str("report"),
        }
    }
}

/// Error returned by the upload/report protocol.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Artifact missing or not a regular file. Nothing was sent.
    #[error("artifact {}: {}", .path.display(), .source)]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Curl reported an error (connection, DNS, TLS, ...).
    #[error("{stage} request failed: {source}")]
    Curl {
        stage: ScanStage,
        #[source]
        source: curl::Error,
    },
    /// Multipart form could not be built.
    #[error("building upload form: {0}")]
    Form(#[from] curl::FormError),
    /// HTTP response had a non-2xx status.
    #[error("{stage} returned HTTP {code}")]
    Http { stage: ScanStage, code: u32 },
    /// Body did not match the expected schema.
    #[error("malformed {stage} response: {detail}")]
    MalformedResponse { stage: ScanStage, detail: String },
}

impl ScanError {
    pub(crate) fn curl(stage: ScanStage) -> impl Fn(curl::Error) -> ScanError {
        move |source| ScanError::Curl { stage, source }
    }

    pub(crate) fn malformed(stage: ScanStage, detail: impl Into<String>) -> ScanError {
        ScanError::MalformedResponse {
            stage,
            detail: detail.into(),
        }
    }

    /// Stage the error happened in, if a request was attempted.
    pub fn stage(&self) -> Option<ScanStage> {
        match self {
            ScanError::Curl { stage, .. }
            | ScanError::Http { stage, .. }
            | ScanError::MalformedResponse { stage, .. } => Some(*stage),
            ScanError::Form(_) => Some(ScanStage::Upload),
            ScanError::Artifact { .. } => None,
        }
    }
}
