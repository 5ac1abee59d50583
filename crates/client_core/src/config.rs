use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const SETTINGS_FILE_NAME: &str = "ragdesk.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("api url '{url}' is not a valid url: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api url '{0}' must use http:// or https://")]
    UnsupportedScheme(String),
    #[error("api url '{0}' must not carry a query or fragment")]
    QueryOrFragment(String),
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Connection settings for the RAG backend, resolved once at startup and
/// passed explicitly to the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn apply_file_contents(&mut self, path: &str, raw: &str) -> Result<(), SettingsError> {
        let file_cfg: SettingsFile = toml::from_str(raw).map_err(|source| SettingsError::Parse {
            path: path.to_string(),
            source,
        })?;
        if let Some(v) = file_cfg.api_url {
            self.api_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        Ok(())
    }

    /// Later names win: `VITE_API_URL` < `RAG_API_URL` < `APP__API_URL`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("VITE_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("RAG_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("APP__API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(err) => tracing::warn!(
                    value = %v,
                    "ignoring APP__REQUEST_TIMEOUT_SECS: {err}"
                ),
            }
        }
    }

    pub fn with_overrides(mut self, api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(v) = api_url {
            self.api_url = v;
        }
        if let Some(v) = timeout_secs {
            self.request_timeout_secs = v;
        }
        self
    }

    pub fn validated(mut self) -> Result<Self, SettingsError> {
        self.api_url = normalize_api_url(&self.api_url)?;
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(self)
    }
}

/// Defaults, then `ragdesk.toml` (working directory first, then the user
/// config directory), then environment.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(settings_file_path().as_deref(), |name| {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    })
}

pub fn load_settings_from(
    file: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    if let Some(path) = file {
        let path_text = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path_text.clone(),
            source,
        })?;
        settings.apply_file_contents(&path_text, &raw)?;
        tracing::debug!(path = %path_text, "loaded settings file");
    }

    settings.apply_env(lookup);
    settings.validated()
}

fn settings_file_path() -> Option<PathBuf> {
    let local = Path::new(SETTINGS_FILE_NAME);
    if local.is_file() {
        return Some(local.to_path_buf());
    }

    let user = dirs::config_dir()?.join("ragdesk").join(SETTINGS_FILE_NAME);
    user.is_file().then_some(user)
}

/// Trims whitespace and trailing slashes so endpoint paths can be appended
/// verbatim. An empty value falls back to the default.
pub fn normalize_api_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_URL.to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|source| SettingsError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(trimmed.to_string()));
    }
    // Endpoint paths are appended to the base verbatim.
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(SettingsError::QueryOrFragment(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}
