use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/relscan/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Build artifact uploaded to VirusTotal.
    pub artifact_path: PathBuf,
    /// Directory whose files get digest sidecars.
    pub release_dir: PathBuf,
    /// VirusTotal REST API root (uploads go to `<api_base_url>/files`).
    pub api_base_url: String,
    /// Root used for the human-facing report link (`<gui_base_url>/gui/file/<sha256>`).
    pub gui_base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Connect timeout for both API calls, in seconds. Unset keeps libcurl's default.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("dist/tempus_ahk.dll"),
            release_dir: PathBuf::from("dist"),
            api_base_url: "https://www.virustotal.com/api/v3".to_string(),
            gui_base_url: "https://www.virustotal.com".to_string(),
            api_key_env: "VIRUS_TOTAL_KEY".to_string(),
            connect_timeout_secs: None,
        }
    }
}

impl ReleaseConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Reads the API key from the configured environment variable.
    /// A missing variable yields an empty key; the service rejects it, not us.
    pub fn api_key(&self) -> ApiKey {
        ApiKey::from_env(&self.api_key_env)
    }
}

/// VirusTotal API key. `Debug` never prints the value.
#[derive(Clone, Default)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_env(var: &str) -> Self {
        Self(std::env::var(var).unwrap_or_default())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("ApiKey(<empty>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("relscan")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReleaseConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ReleaseConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ReleaseConfig = toml::from_str(&data)?;
    Ok(cfg)
}
