//! `relscan hash` – digests and sidecars only, no network.

use anyhow::Result;
use relscan_core::config::ReleaseConfig;
use relscan_core::pipeline;
use std::io::{self, Write};

pub fn run_hash(cfg: &ReleaseConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    pipeline::run_hashes(&cfg.release_dir, &mut out)?;
    out.flush()?;
    Ok(())
}
