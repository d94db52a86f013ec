use leadgen::config::{AuthConfig, PlacesConfig};
use leadgen::error::AppError;
use leadgen::leads::{GooglePlacesClient, LeadSearchService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Search service backed by Google Places, or an unconfigured one when no API key is set.
pub(crate) fn lead_service(
    config: &PlacesConfig,
) -> Result<LeadSearchService<GooglePlacesClient>, AppError> {
    let client = GooglePlacesClient::from_config(config)?;
    if client.is_none() {
        warn!("GOOGLE_MAPS_API_KEY is not set; search and autocomplete will report a configuration error");
    }
    Ok(LeadSearchService::from_provider(client))
}

pub(crate) fn warn_if_login_disabled(config: &AuthConfig) {
    if config.credentials.is_none() {
        warn!("AUTH_USERNAME/AUTH_PASSWORD are not set; dashboard login is disabled");
    }
}
