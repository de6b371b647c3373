use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::category::DEFAULT_DATA_ROOT;
use crate::client::DEFAULT_API_URL;
use crate::download::default_download_dir;

pub const ENV_API_URL: &str = "TRIALDESK_API_URL";
pub const ENV_DOWNLOAD_DIR: &str = "TRIALDESK_DOWNLOAD_DIR";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub backend: Option<BackendConfig>,
    pub output: Option<OutputConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub api_url: Option<String>,
    pub data_root: Option<String>,
    /// 0 disables the timeout.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub download_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/trialdesk/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("trialdesk").join("config.toml"))
}

/// Load config by cascading CWD `.trialdesk.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".trialdesk.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Read one config file. A missing file is silent; an unreadable or
/// malformed one is logged and skipped.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read config file");
            return None;
        }
    };
    match toml::from_str(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_backend = base.backend.unwrap_or_default();
    let over_backend = overlay.backend.unwrap_or_default();
    let base_output = base.output.unwrap_or_default();
    let over_output = overlay.output.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let over_display = overlay.display.unwrap_or_default();

    ConfigFile {
        backend: Some(BackendConfig {
            api_url: over_backend.api_url.or(base_backend.api_url),
            data_root: over_backend.data_root.or(base_backend.data_root),
            request_timeout_secs: over_backend
                .request_timeout_secs
                .or(base_backend.request_timeout_secs),
        }),
        output: Some(OutputConfig {
            download_dir: over_output.download_dir.or(base_output.download_dir),
        }),
        display: Some(DisplayConfig {
            theme: over_display.theme.or(base_display.theme),
        }),
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub data_root: Option<String>,
    pub theme: Option<String>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub data_root: String,
    pub download_dir: PathBuf,
    pub request_timeout: Option<Duration>,
    pub theme: String,
}

impl Settings {
    /// Resolve CLI > environment > config file > default. `env` looks up an
    /// environment variable; empty values count as unset.
    pub fn resolve(
        file: &ConfigFile,
        cli: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Settings {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let backend = file.backend.clone().unwrap_or_default();
        let output = file.output.clone().unwrap_or_default();
        let display = file.display.clone().unwrap_or_default();
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let api_url = cli
            .api_url
            .clone()
            .or_else(|| env(ENV_API_URL))
            .or_else(|| non_empty(backend.api_url))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let download_dir = cli
            .download_dir
            .clone()
            .or_else(|| env(ENV_DOWNLOAD_DIR).map(PathBuf::from))
            .or_else(|| non_empty(output.download_dir).map(PathBuf::from))
            .unwrap_or_else(default_download_dir);

        let data_root = cli
            .data_root
            .clone()
            .or_else(|| non_empty(backend.data_root))
            .unwrap_or_else(|| DEFAULT_DATA_ROOT.to_string());

        let theme = cli
            .theme
            .clone()
            .or_else(|| non_empty(display.theme))
            .unwrap_or_else(|| "hacker".to_string());

        let request_timeout = backend
            .request_timeout_secs
            .filter(|&s| s > 0)
            .map(Duration::from_secs);

        Settings {
            api_url,
            data_root,
            download_dir,
            request_timeout,
            theme,
        }
    }
}
