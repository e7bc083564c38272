//! Tests for applying CLI path overrides to the loaded config.

use crate::cli::apply_overrides;
use relscan_core::config::ReleaseConfig;
use std::path::PathBuf;

#[test]
fn no_overrides_keeps_config() {
    let cfg = apply_overrides(ReleaseConfig::default(), None, None);
    assert_eq!(cfg.artifact_path, PathBuf::from("dist/tempus_ahk.dll"));
    assert_eq!(cfg.release_dir, PathBuf::from("dist"));
}

#[test]
fn overrides_replace_paths_only() {
    let cfg = apply_overrides(
        ReleaseConfig::default(),
        Some(PathBuf::from("build/setup.exe")),
        Some(PathBuf::from("build/out")),
    );
    assert_eq!(cfg.artifact_path, PathBuf::from("build/setup.exe"));
    assert_eq!(cfg.release_dir, PathBuf::from("build/out"));
    assert_eq!(cfg.api_key_env, "VIRUS_TOTAL_KEY");
}
