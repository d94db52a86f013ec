use async_trait::async_trait;

use super::domain::{LocationSuggestion, PlaceCandidate};

/// Capability the lead pipeline needs from an upstream places service.
///
/// The HTTP client and the in-memory fakes used by tests both implement this,
/// so aggregation can be exercised without network access.
#[async_trait]
pub trait PlacesProvider: Send + Sync + std::fmt::Debug {
    /// Run one free-text search and return the matching places.
    async fn search_text(&self, query: &str) -> Result<Vec<PlaceCandidate>, ProviderError>;

    /// Suggest locations for a partial input string.
    async fn autocomplete(&self, input: &str) -> Result<Vec<LocationSuggestion>, ProviderError>;
}

/// Failure of a single upstream call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("places transport failed: {0}")]
    Transport(String),
    #[error("places API responded with status {status}")]
    Status { status: u16 },
    #[error("unable to decode places response: {0}")]
    Decode(String),
}
