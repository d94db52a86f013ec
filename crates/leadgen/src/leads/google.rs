use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{LocationSuggestion, PlaceCandidate, PlaceReview};
use super::provider::{PlacesProvider, ProviderError};
use crate::config::PlacesConfig;

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1";

const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.nationalPhoneNumber,places.internationalPhoneNumber,places.rating,\
places.userRatingCount,places.websiteUri,places.googleMapsUri,places.types,\
places.businessStatus,places.currentOpeningHours,places.editorialSummary,places.reviews,\
places.primaryTypeDisplayName,places.regularOpeningHours";

const AUTOCOMPLETE_TYPES: [&str; 4] = [
    "locality",
    "sublocality",
    "administrative_area_level_1",
    "postal_code",
];

/// Google Places (New) API client.
pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: u8,
}

impl fmt::Debug for GooglePlacesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GooglePlacesClient")
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl GooglePlacesClient {
    /// Build a client from configuration. `None` when no API key is configured.
    pub fn from_config(config: &PlacesConfig) -> Result<Option<Self>, ProviderError> {
        match &config.api_key {
            Some(api_key) => Self::new(api_key.clone(), config).map(Some),
            None => Ok(None),
        }
    }

    pub fn new(api_key: String, config: &PlacesConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: config.max_results,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn post<B, T>(
        &self,
        endpoint: &str,
        field_mask: Option<&str>,
        body: &B,
    ) -> Result<T, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut request = self
            .http
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .json(body);
        if let Some(mask) = field_mask {
            request = request.header("X-Goog-FieldMask", mask);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn search_text(&self, query: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let body = SearchTextRequest {
            text_query: query,
            max_result_count: self.max_results,
            rank_preference: "RELEVANCE",
        };

        let response: SearchTextResponse = self
            .post("places:searchText", Some(SEARCH_FIELD_MASK), &body)
            .await?;
        let candidates = response.into_candidates();
        debug!(query, count = candidates.len(), "places text search returned");
        Ok(candidates)
    }

    async fn autocomplete(&self, input: &str) -> Result<Vec<LocationSuggestion>, ProviderError> {
        let body = AutocompleteRequest {
            input,
            included_primary_types: &AUTOCOMPLETE_TYPES,
        };

        let response: AutocompleteResponse = self.post("places:autocomplete", None, &body).await?;
        Ok(response.into_suggestions())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    max_result_count: u8,
    rank_preference: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AutocompleteRequest<'a> {
    input: &'a str,
    included_primary_types: &'a [&'a str],
}

#[derive(Debug, Default, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<WirePlace>,
}

impl SearchTextResponse {
    /// Places without an id cannot be deduplicated and are skipped.
    fn into_candidates(self) -> Vec<PlaceCandidate> {
        self.places
            .into_iter()
            .filter(|place| !place.id.is_empty())
            .map(PlaceCandidate::from)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePlace {
    #[serde(default)]
    id: String,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    national_phone_number: Option<String>,
    international_phone_number: Option<String>,
    rating: Option<f64>,
    user_rating_count: Option<u32>,
    website_uri: Option<String>,
    google_maps_uri: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    business_status: Option<String>,
    current_opening_hours: Option<OpeningHours>,
    editorial_summary: Option<LocalizedText>,
    #[serde(default)]
    reviews: Vec<WireReview>,
    primary_type_display_name: Option<LocalizedText>,
    regular_opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpeningHours {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_descriptions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReview {
    relative_publish_time_description: Option<String>,
    rating: Option<f64>,
    text: Option<LocalizedText>,
    author_attribution: Option<AuthorAttribution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorAttribution {
    display_name: Option<String>,
}

impl From<WirePlace> for PlaceCandidate {
    fn from(place: WirePlace) -> Self {
        let open_now = place
            .current_opening_hours
            .as_ref()
            .and_then(|hours| hours.open_now);
        let weekday_hours = place
            .regular_opening_hours
            .map(|hours| hours.weekday_descriptions)
            .unwrap_or_default();

        Self {
            id: place.id,
            display_name: place.display_name.map(|name| name.text),
            formatted_address: place.formatted_address,
            national_phone: place.national_phone_number,
            international_phone: place.international_phone_number,
            website_uri: place.website_uri,
            maps_uri: place.google_maps_uri,
            rating: place.rating,
            user_rating_count: place.user_rating_count,
            business_status: place.business_status,
            open_now,
            types: place.types,
            primary_type: place.primary_type_display_name.map(|name| name.text),
            editorial_summary: place.editorial_summary.map(|summary| summary.text),
            weekday_hours,
            reviews: place.reviews.into_iter().map(PlaceReview::from).collect(),
        }
    }
}

impl From<WireReview> for PlaceReview {
    fn from(review: WireReview) -> Self {
        Self {
            text: review.text.map(|text| text.text),
            rating: review.rating,
            author: review.author_attribution.and_then(|author| author.display_name),
            relative_time: review.relative_publish_time_description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AutocompleteResponse {
    #[serde(default)]
    suggestions: Vec<WireSuggestion>,
}

impl AutocompleteResponse {
    /// Query predictions carry no place id and are dropped.
    fn into_suggestions(self) -> Vec<LocationSuggestion> {
        self.suggestions
            .into_iter()
            .filter_map(|suggestion| suggestion.place_prediction)
            .map(|prediction| LocationSuggestion {
                description: prediction.text.text,
                place_id: prediction.place_id,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSuggestion {
    place_prediction: Option<PlacePrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacePrediction {
    place_id: String,
    text: LocalizedText,
}
