use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, warn};

use super::autocomplete;
use super::domain::{LocationSuggestion, PlaceCandidate, ScoredLead};
use super::industries::build_queries;
use super::provider::PlacesProvider;
use super::scoring::score_candidate;

/// Search form submitted by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSearchRequest {
    /// Anything other than a JSON string reads as blank and fails validation.
    #[serde(default, deserialize_with = "deserialize_location")]
    pub location: String,
    /// `None` searches every known industry.
    #[serde(default)]
    pub industries: Option<Vec<String>>,
    #[serde(default)]
    pub custom_query: Option<String>,
}

fn deserialize_location<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(location) => Ok(location),
        _ => Ok(String::new()),
    }
}

/// Error raised by the lead search service.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Google Maps API key not configured")]
    MissingApiKey,
    #[error("Location is required")]
    InvalidLocation,
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Fans text queries out to the places provider, then merges, filters, scores, and ranks.
pub struct LeadSearchService<P> {
    provider: Option<Arc<P>>,
}

impl<P> Clone for LeadSearchService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<P> LeadSearchService<P>
where
    P: PlacesProvider + 'static,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Service with no upstream credential; every call reports `MissingApiKey`.
    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    pub fn from_provider(provider: Option<P>) -> Self {
        Self {
            provider: provider.map(Arc::new),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<P>, SearchError> {
        self.provider.as_ref().ok_or(SearchError::MissingApiKey)
    }

    /// Run the full search pipeline.
    ///
    /// Individual upstream failures degrade to an empty batch for that query; only
    /// a panicked query task surfaces as [`SearchError::Internal`].
    pub async fn search(&self, request: LeadSearchRequest) -> Result<Vec<ScoredLead>, SearchError> {
        let provider = self.provider()?;

        let location = request.location.trim();
        if location.is_empty() {
            return Err(SearchError::InvalidLocation);
        }

        let queries = build_queries(
            location,
            request.industries.as_deref(),
            request.custom_query.as_deref(),
        );
        if queries.is_empty() {
            info!(location, "no queries resolved; skipping upstream search");
            return Ok(Vec::new());
        }

        info!(location, queries = queries.len(), "issuing places searches");
        let batches = fan_out(provider, queries).await?;
        let fetched: usize = batches.iter().map(Vec::len).sum();

        let leads = rank(merge_by_id(batches));
        info!(
            location,
            fetched,
            leads = leads.len(),
            "lead search complete"
        );
        Ok(leads)
    }

    /// Location autocomplete proxied through the same provider.
    pub async fn suggest_locations(
        &self,
        input: &str,
    ) -> Result<Vec<LocationSuggestion>, SearchError> {
        let provider = self.provider()?;
        Ok(autocomplete::suggest(provider.as_ref(), input).await)
    }
}

async fn fan_out<P>(
    provider: &Arc<P>,
    queries: Vec<String>,
) -> Result<Vec<Vec<PlaceCandidate>>, SearchError>
where
    P: PlacesProvider + 'static,
{
    let handles: Vec<_> = queries
        .into_iter()
        .map(|query| {
            let provider = Arc::clone(provider);
            tokio::spawn(async move {
                match provider.search_text(&query).await {
                    Ok(places) => places,
                    Err(err) => {
                        warn!(query = %query, error = %err, "places query failed");
                        Vec::new()
                    }
                }
            })
        })
        .collect();

    futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.map_err(|err| SearchError::Internal(err.to_string())))
        .collect()
}

/// Deduplicate by place id. The last record seen for an id wins, placed where the id
/// first appeared so output order does not depend on hash iteration.
pub(crate) fn merge_by_id(batches: Vec<Vec<PlaceCandidate>>) -> Vec<PlaceCandidate> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<PlaceCandidate> = Vec::new();

    for candidate in batches.into_iter().flatten() {
        match positions.get(&candidate.id) {
            Some(&index) => merged[index] = candidate,
            None => {
                positions.insert(candidate.id.clone(), merged.len());
                merged.push(candidate);
            }
        }
    }

    merged
}

/// Drop non-operational candidates, score the rest, and sort by descending score.
/// The sort is stable, so equal scores keep merge order.
pub(crate) fn rank(candidates: Vec<PlaceCandidate>) -> Vec<ScoredLead> {
    let mut leads: Vec<ScoredLead> = candidates
        .into_iter()
        .filter(PlaceCandidate::is_operational)
        .map(|candidate| {
            let score = score_candidate(&candidate);
            ScoredLead::from_candidate(candidate, score)
        })
        .collect();

    leads.sort_by(|a, b| b.lead_score.cmp(&a.lead_score));
    leads
}
