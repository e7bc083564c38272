//! `relscan scan` – upload the artifact and print the report link.

use anyhow::{Context, Result};
use relscan_core::config::ReleaseConfig;
use relscan_core::summary;
use relscan_core::virustotal::{gui_file_url, ArtifactScanner, VirusTotalClient};
use std::io;

pub fn run_scan(cfg: &ReleaseConfig) -> Result<()> {
    let client = VirusTotalClient::from_config(cfg);
    let submission = client
        .submit(&cfg.artifact_path)
        .context("submit artifact to VirusTotal")?;
    let url = gui_file_url(&cfg.gui_base_url, submission.sha256());
    summary::write_report_link(&mut io::stdout().lock(), &url)?;
    Ok(())
}
