use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::leads::domain::{LocationSuggestion, PlaceCandidate};
use crate::leads::provider::{PlacesProvider, ProviderError};
use crate::leads::LeadSearchService;

/// Provider that answers from a per-query script and records every call.
#[derive(Debug, Default)]
pub(super) struct ScriptedProvider {
    searches: HashMap<String, Result<Vec<PlaceCandidate>, u16>>,
    suggestions: Option<Vec<LocationSuggestion>>,
    search_calls: Mutex<Vec<String>>,
    autocomplete_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn returning(mut self, query: &str, places: Vec<PlaceCandidate>) -> Self {
        self.searches.insert(query.to_string(), Ok(places));
        self
    }

    pub(super) fn failing(mut self, query: &str, status: u16) -> Self {
        self.searches.insert(query.to_string(), Err(status));
        self
    }

    pub(super) fn suggesting(mut self, suggestions: Vec<LocationSuggestion>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    pub(super) fn search_calls(&self) -> Vec<String> {
        self.search_calls
            .lock()
            .expect("call log mutex poisoned")
            .clone()
    }

    pub(super) fn autocomplete_calls(&self) -> usize {
        self.autocomplete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesProvider for ScriptedProvider {
    async fn search_text(&self, query: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
        self.search_calls
            .lock()
            .expect("call log mutex poisoned")
            .push(query.to_string());

        match self.searches.get(query) {
            Some(Ok(places)) => Ok(places.clone()),
            Some(Err(status)) => Err(ProviderError::Status { status: *status }),
            None => Ok(Vec::new()),
        }
    }

    async fn autocomplete(&self, _input: &str) -> Result<Vec<LocationSuggestion>, ProviderError> {
        self.autocomplete_calls.fetch_add(1, Ordering::SeqCst);
        match &self.suggestions {
            Some(suggestions) => Ok(suggestions.clone()),
            None => Err(ProviderError::Transport("connection refused".to_string())),
        }
    }
}

/// Provider whose search task panics, standing in for an unexpected orchestration fault.
#[derive(Debug, Default)]
pub(super) struct PanickingProvider;

#[async_trait]
impl PlacesProvider for PanickingProvider {
    async fn search_text(&self, query: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
        panic!("provider bug while searching '{query}'");
    }

    async fn autocomplete(&self, _input: &str) -> Result<Vec<LocationSuggestion>, ProviderError> {
        Ok(Vec::new())
    }
}

pub(super) fn service(
    provider: ScriptedProvider,
) -> (LeadSearchService<ScriptedProvider>, Arc<ScriptedProvider>) {
    let provider = Arc::new(provider);
    (LeadSearchService::new(provider.clone()), provider)
}

pub(super) fn place(id: &str, name: &str) -> PlaceCandidate {
    PlaceCandidate {
        id: id.to_string(),
        display_name: Some(name.to_string()),
        formatted_address: Some(format!("{name} HQ, Des Moines, IA")),
        ..PlaceCandidate::default()
    }
}

/// Phone, website, 60 reviews at 4.7, open now: scores 9.
pub(super) fn hot_place(id: &str, name: &str) -> PlaceCandidate {
    PlaceCandidate {
        international_phone: Some("+1 515-555-0199".to_string()),
        website_uri: Some(format!("https://{id}.example.com")),
        user_rating_count: Some(60),
        rating: Some(4.7),
        open_now: Some(true),
        ..place(id, name)
    }
}

/// Phone, 30 reviews at 4.5, open now: scores 6.
pub(super) fn warm_place(id: &str, name: &str) -> PlaceCandidate {
    PlaceCandidate {
        national_phone: Some("(515) 555-0100".to_string()),
        user_rating_count: Some(30),
        rating: Some(4.5),
        open_now: Some(true),
        ..place(id, name)
    }
}

pub(super) fn closed_place(id: &str, name: &str) -> PlaceCandidate {
    PlaceCandidate {
        business_status: Some("CLOSED_PERMANENTLY".to_string()),
        ..hot_place(id, name)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
