//! Settings Models
//!
//! Funnel configuration as stored in `settings.toml`, plus the partial
//! update applied on top of it from the environment and the command line.

use serde::{Deserialize, Serialize};
use url::Url;

use quiz_funnel_core::{Catalog, ProxyConfig};

/// Where quiz questions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    /// Generated per run by the remote model
    Remote,
    /// Built-in question bank, no network call
    Fixed,
}

impl Default for QuestionSource {
    fn default() -> Self {
        Self::Remote
    }
}

/// Tracking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// Master switch; when off a no-op notifier is installed
    pub enabled: bool,
    /// Endpoint that receives one JSON POST per event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Also emit each event as a structured log line
    pub log_events: bool,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            log_events: true,
        }
    }
}

/// Funnel configuration stored in settings.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelSettings {
    /// Gemini model name
    pub model: String,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Maximum output tokens per request
    pub max_tokens: u32,
    /// Override for the Generative Language API root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Remote-generated or built-in questions
    pub question_source: QuestionSource,
    /// Number of questions to request from the model
    pub question_count: usize,
    /// Minimum time the analyzing step lasts, in milliseconds
    pub min_analyzing_ms: u64,
    /// Ask for an email before revealing the result
    pub lead_capture: bool,
    pub tracking: TrackingSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    /// Replaces the built-in catalog when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Catalog>,
}

impl Default for FunnelSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            base_url: None,
            request_timeout_secs: 60,
            question_source: QuestionSource::Remote,
            question_count: 5,
            min_analyzing_ms: 3500,
            lead_capture: false,
            tracking: TrackingSettings::default(),
            proxy: None,
            catalog: None,
        }
    }
}

/// Partial settings update (environment variables and CLI flags)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub model: Option<String>,
    pub question_source: Option<QuestionSource>,
    pub tracking_enabled: Option<bool>,
    pub tracking_url: Option<String>,
    pub proxy: Option<ProxyConfig>,
}

impl FunnelSettings {
    /// Apply a partial update to the settings
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(source) = update.question_source {
            self.question_source = source;
        }
        if let Some(enabled) = update.tracking_enabled {
            self.tracking.enabled = enabled;
        }
        if let Some(url) = update.tracking_url {
            self.tracking.url = Some(url);
        }
        if let Some(proxy) = update.proxy {
            self.proxy = Some(proxy);
        }
    }

    /// Validate the settings values
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if self.question_count == 0 {
            return Err("question_count must be at least 1".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be at least 1".to_string());
        }
        if let Some(catalog) = &self.catalog {
            if catalog.is_empty() {
                return Err("catalog must contain at least one product".to_string());
            }
        }
        if let Some(raw) = &self.tracking.url {
            validate_http_url(raw).map_err(|e| format!("tracking.url: {}", e))?;
        }
        Ok(())
    }

    /// The configured catalog, or the built-in one
    pub fn resolved_catalog(&self) -> Catalog {
        self.catalog.clone().unwrap_or_default()
    }
}

/// Accept only absolute http(s) URLs with a host
fn validate_http_url(raw: &str) -> Result<(), String> {
    let parsed = Url::parse(raw).map_err(|e| format!("invalid URL {}: {}", raw, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("expected an http(s) URL, got {}", raw));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(format!("URL has no host: {}", raw));
    }
    Ok(())
}
