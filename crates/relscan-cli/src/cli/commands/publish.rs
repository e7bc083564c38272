//! `relscan publish` – submit the artifact, hash the release dir, print the summary.

use anyhow::Result;
use relscan_core::config::ReleaseConfig;
use relscan_core::pipeline;
use relscan_core::virustotal::VirusTotalClient;
use std::io;

pub fn run_publish(cfg: &ReleaseConfig) -> Result<()> {
    let client = VirusTotalClient::from_config(cfg);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = pipeline::run_release(cfg, &client, &mut out)?;
    tracing::info!(
        "published {} file hash(es), report at {}",
        report.entries.len(),
        report.report_url
    );
    Ok(())
}
