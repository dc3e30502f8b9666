//! TOML Configuration Management
//!
//! Reads the funnel settings file, layers environment overrides on top,
//! and resolves the model API key.

use std::fs;
use std::path::{Path, PathBuf};

use quiz_funnel_core::ProxyConfig;

use crate::models::settings::{FunnelSettings, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{ensure_dir, settings_path};

/// Environment variable holding the Gemini API key
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Fallback key variable name used by hosted deployments
pub const API_KEY_FALLBACK_VAR: &str = "API_KEY";
pub const MODEL_VAR: &str = "QUIZ_FUNNEL_MODEL";
pub const TRACKING_URL_VAR: &str = "QUIZ_FUNNEL_TRACKING_URL";
pub const PROXY_VAR: &str = "QUIZ_FUNNEL_PROXY";

/// Configuration service for the funnel settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: FunnelSettings,
}

impl ConfigService {
    /// Load settings from `path`, or from the default location.
    ///
    /// A missing file yields defaults; nothing is written to disk.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => settings_path()?,
        };

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "settings file not found, using defaults");
            FunnelSettings::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<FunnelSettings> {
        let content = fs::read_to_string(path)?;
        let config: FunnelSettings = toml::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file
    fn save_to_file(path: &Path, config: &FunnelSettings) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write a default settings file. Refuses to overwrite unless `force`.
    pub fn write_default(path: &Path, force: bool) -> AppResult<()> {
        if path.exists() && !force {
            return Err(AppError::config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        Self::save_to_file(path, &FunnelSettings::default())
    }

    /// Path the settings were loaded from
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Consume the service, keeping only the settings
    pub fn into_config(self) -> FunnelSettings {
        self.config
    }

    /// Apply a partial update in memory and re-validate
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<&FunnelSettings> {
        self.config.apply_update(update);
        self.config.validate().map_err(AppError::validation)?;
        Ok(&self.config)
    }

    /// Apply the process environment overrides
    pub fn apply_env(&mut self) -> AppResult<&FunnelSettings> {
        let update = env_update(|name| std::env::var(name).ok())?;
        self.update_config(update)
    }
}

/// Build a settings update from environment lookups.
///
/// Blank values count as unset.
pub fn env_update<F>(lookup: F) -> AppResult<SettingsUpdate>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let proxy = match get(PROXY_VAR) {
        Some(raw) => Some(ProxyConfig::parse(&raw)?),
        None => None,
    };

    Ok(SettingsUpdate {
        model: get(MODEL_VAR),
        tracking_url: get(TRACKING_URL_VAR),
        proxy,
        ..Default::default()
    })
}

/// Resolve the model API key from the environment
pub fn resolve_api_key<F>(lookup: F) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    [API_KEY_VAR, API_KEY_FALLBACK_VAR]
        .iter()
        .filter_map(|name| lookup(name))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .ok_or_else(|| {
            AppError::config(format!(
                "{} is not set; export it or add it to a .env file",
                API_KEY_VAR
            ))
        })
}
