use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::aggregator::{LeadSearchRequest, LeadSearchService};
use super::domain::{LocationSuggestion, ScoredLead};
use super::export::{export_leads, ExportContext, ExportFormat, ExportSelection};
use super::provider::PlacesProvider;
use crate::error::AppError;

/// Router builder exposing search, autocomplete, and export endpoints.
pub fn lead_router<P>(service: LeadSearchService<P>) -> Router
where
    P: PlacesProvider + 'static,
{
    Router::new()
        .route("/api/search", post(search_handler::<P>))
        .route("/api/autocomplete", post(autocomplete_handler::<P>))
        .route("/api/export", post(export_handler))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredLead>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteRequest {
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<LocationSuggestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub results: Vec<ScoredLead>,
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

pub(crate) async fn search_handler<P>(
    State(service): State<LeadSearchService<P>>,
    payload: Result<Json<LeadSearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError>
where
    P: PlacesProvider + 'static,
{
    let Json(request) = payload?;
    let results = service.search(request).await?;
    Ok(Json(SearchResponse { results }))
}

pub(crate) async fn autocomplete_handler<P>(
    State(service): State<LeadSearchService<P>>,
    payload: Result<Json<AutocompleteRequest>, JsonRejection>,
) -> Result<Json<AutocompleteResponse>, AppError>
where
    P: PlacesProvider + 'static,
{
    let Json(request) = payload?;
    let input = request.input.unwrap_or_default();
    let suggestions = service.suggest_locations(&input).await?;
    Ok(Json(AutocompleteResponse { suggestions }))
}

pub(crate) async fn export_handler(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let ExportRequest {
        format,
        results,
        selected,
        location,
        industry,
    } = request;

    let context = ExportContext {
        location,
        industry,
        generated_on: Local::now().date_naive(),
    };
    let file = export_leads(&results, &ExportSelection::only(selected), format, &context)?;
    info!(
        file = file.file_name,
        bytes = file.bytes.len(),
        "lead export generated"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response())
}
