//! Application State
//!
//! Assembles the provider, recommendation client, tracking and controller
//! from the resolved settings.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use quiz_funnel_core::{FunnelNotifier, NoopNotifier, RecommendationClient};
use quiz_funnel_llm::{GeminiProvider, LlmProvider, ProviderConfig};

use crate::models::settings::FunnelSettings;
use crate::services::quiz::{ControllerOptions, QuizController};
use crate::services::recommendation::LlmRecommendationClient;
use crate::services::tracking::{
    HttpTrackingChannel, LogTrackingChannel, TrackingChannel, TrackingService,
};
use crate::utils::error::{AppError, AppResult};

/// Provider configuration derived from the settings
pub fn provider_config(settings: &FunnelSettings, api_key: impl Into<String>) -> ProviderConfig {
    ProviderConfig {
        base_url: settings.base_url.clone(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        timeout_secs: settings.request_timeout_secs,
        proxy: settings.proxy.clone(),
        ..ProviderConfig::new(settings.model.clone())
    }
    .with_api_key(api_key)
}

/// Upper bound on how long shutdown waits for pending tracking events
pub const TRACKING_FLUSH_TIMEOUT: Duration = Duration::from_secs(3);

/// Build the tracking service for the tracking settings.
///
/// Disabled tracking, or tracking with no channel, yields `None`.
pub fn build_tracking(settings: &FunnelSettings) -> AppResult<Option<Arc<TrackingService>>> {
    let tracking = &settings.tracking;
    if !tracking.enabled {
        return Ok(None);
    }

    let mut channels: Vec<Arc<dyn TrackingChannel>> = Vec::new();
    if tracking.log_events {
        channels.push(Arc::new(LogTrackingChannel));
    }
    if let Some(url) = &tracking.url {
        let channel = HttpTrackingChannel::new(url, settings.proxy.as_ref())
            .map_err(|e| AppError::config(e.to_string()))?;
        channels.push(Arc::new(channel));
    }

    if channels.is_empty() {
        warn!("tracking is enabled but no channel is configured");
        return Ok(None);
    }

    let service = TrackingService::new(channels);
    debug!(
        session_id = service.session_id(),
        channels = service.channel_count(),
        "tracking enabled"
    );
    Ok(Some(Arc::new(service)))
}

/// Fully wired funnel
pub struct FunnelApp {
    settings: FunnelSettings,
    controller: QuizController,
    tracking: Option<Arc<TrackingService>>,
}

impl FunnelApp {
    pub fn builder(settings: FunnelSettings) -> FunnelAppBuilder {
        FunnelAppBuilder {
            settings,
            api_key: None,
            provider: None,
            client: None,
            notifier: None,
        }
    }

    pub fn settings(&self) -> &FunnelSettings {
        &self.settings
    }

    pub fn controller(&self) -> &QuizController {
        &self.controller
    }

    /// Wait (bounded) for tracking events still in flight
    pub async fn shutdown(&self, timeout: Duration) {
        if let Some(tracking) = &self.tracking {
            tracking.flush(timeout).await;
        }
    }
}

/// Builder for `FunnelApp`. Anything not supplied is built from settings.
pub struct FunnelAppBuilder {
    settings: FunnelSettings,
    api_key: Option<String>,
    provider: Option<Arc<dyn LlmProvider>>,
    client: Option<Arc<dyn RecommendationClient>>,
    notifier: Option<Arc<dyn FunnelNotifier>>,
}

impl FunnelAppBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn client(mut self, client: Arc<dyn RecommendationClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn FunnelNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    fn resolve_provider(&mut self) -> AppResult<Arc<dyn LlmProvider>> {
        if let Some(provider) = self.provider.take() {
            return Ok(provider);
        }
        let api_key = self.api_key.take().ok_or_else(|| {
            AppError::config("an API key is required for the remote model")
        })?;
        let provider = GeminiProvider::new(provider_config(&self.settings, api_key))?;
        Ok(Arc::new(provider))
    }

    pub fn build(mut self) -> AppResult<FunnelApp> {
        self.settings.validate().map_err(AppError::validation)?;
        let catalog = self.settings.resolved_catalog();

        let client: Arc<dyn RecommendationClient> = match self.client.take() {
            Some(client) => client,
            None => Arc::new(LlmRecommendationClient::new(
                self.resolve_provider()?,
                self.settings.question_source,
                self.settings.question_count,
                catalog.clone(),
            )),
        };

        let mut tracking = None;
        let notifier: Arc<dyn FunnelNotifier> = match self.notifier.take() {
            Some(notifier) => notifier,
            None => match build_tracking(&self.settings)? {
                Some(service) => {
                    tracking = Some(Arc::clone(&service));
                    service
                }
                None => Arc::new(NoopNotifier),
            },
        };

        let options = ControllerOptions {
            min_analyzing: Duration::from_millis(self.settings.min_analyzing_ms),
            lead_capture: self.settings.lead_capture,
        };

        let controller = QuizController::new(client, notifier, catalog, options);
        Ok(FunnelApp {
            settings: self.settings,
            controller,
            tracking,
        })
    }
}
