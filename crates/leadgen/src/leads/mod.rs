//! Lead discovery: places search fan-out, merge, scoring, ranking, and export.

pub mod aggregator;
pub mod autocomplete;
pub mod domain;
pub mod export;
pub mod google;
pub mod industries;
pub mod provider;
pub mod router;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use aggregator::{LeadSearchRequest, LeadSearchService, SearchError};
pub use domain::{
    LocationSuggestion, PlaceCandidate, PlaceReview, RecentReview, ScoredLead, OPERATIONAL_STATUS,
};
pub use export::{
    export_leads, ExportContext, ExportError, ExportFormat, ExportSelection, ExportedFile,
};
pub use google::GooglePlacesClient;
pub use industries::{build_queries, Industry};
pub use provider::{PlacesProvider, ProviderError};
pub use router::lead_router;
pub use scoring::{score_candidate, LeadLabel, LeadScore, ReviewVolume, ScoreBreakdown, MAX_SCORE};
