use serde::{Deserialize, Serialize};

use super::scoring::{LeadLabel, LeadScore, ScoreBreakdown};

/// Status value the places API reports for a business that is trading.
pub const OPERATIONAL_STATUS: &str = "OPERATIONAL";

/// Business record as returned by the upstream places search, before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub id: String,
    pub display_name: Option<String>,
    pub formatted_address: Option<String>,
    pub national_phone: Option<String>,
    pub international_phone: Option<String>,
    pub website_uri: Option<String>,
    pub maps_uri: Option<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<u32>,
    pub business_status: Option<String>,
    pub open_now: Option<bool>,
    pub types: Vec<String>,
    pub primary_type: Option<String>,
    pub editorial_summary: Option<String>,
    pub weekday_hours: Vec<String>,
    pub reviews: Vec<PlaceReview>,
}

impl PlaceCandidate {
    pub fn has_phone(&self) -> bool {
        present(&self.national_phone) || present(&self.international_phone)
    }

    pub fn has_website(&self) -> bool {
        present(&self.website_uri)
    }

    /// International format is preferred for export and dialing.
    pub fn preferred_phone(&self) -> Option<&str> {
        self.international_phone
            .as_deref()
            .filter(|value| !value.is_empty())
            .or_else(|| self.national_phone.as_deref().filter(|value| !value.is_empty()))
    }

    /// Absent status is treated as operating.
    pub fn is_operational(&self) -> bool {
        match self.business_status.as_deref() {
            None => true,
            Some(status) => status == OPERATIONAL_STATUS,
        }
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|inner| !inner.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceReview {
    pub text: Option<String>,
    pub rating: Option<f64>,
    pub author: Option<String>,
    pub relative_time: Option<String>,
}

/// Location suggestion reshaped from the upstream autocomplete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSuggestion {
    pub description: String,
    pub place_id: String,
}

/// Review excerpt shown alongside a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentReview {
    pub text: String,
    pub rating: Option<f64>,
    pub author: String,
    pub time_description: String,
}

impl From<&PlaceReview> for RecentReview {
    fn from(review: &PlaceReview) -> Self {
        Self {
            text: review.text.clone().unwrap_or_default(),
            rating: review.rating,
            author: review.author.clone().unwrap_or_default(),
            time_description: review.relative_time.clone().unwrap_or_default(),
        }
    }
}

/// Presentation view of a scored candidate, as served to the dashboard and exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredLead {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub website: String,
    pub maps_url: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub open_now: Option<bool>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub weekday_hours: Vec<String>,
    pub lead_score: u8,
    pub lead_label: LeadLabel,
    pub score_breakdown: ScoreBreakdown,
    #[serde(default)]
    pub recent_review: Option<RecentReview>,
}

impl ScoredLead {
    pub fn from_candidate(candidate: PlaceCandidate, score: LeadScore) -> Self {
        let phone = candidate.preferred_phone().unwrap_or_default().to_string();
        let recent_review = candidate.reviews.first().map(RecentReview::from);

        Self {
            id: candidate.id,
            name: candidate
                .display_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            address: candidate.formatted_address.unwrap_or_default(),
            phone,
            rating: candidate.rating,
            user_ratings_total: candidate.user_rating_count,
            website: candidate.website_uri.unwrap_or_default(),
            maps_url: candidate.maps_uri.unwrap_or_default(),
            types: candidate.types,
            open_now: candidate.open_now,
            description: candidate.editorial_summary.unwrap_or_default(),
            business_type: candidate.primary_type.unwrap_or_default(),
            weekday_hours: candidate.weekday_hours,
            lead_score: score.score,
            lead_label: score.label,
            score_breakdown: score.breakdown,
            recent_review,
        }
    }
}
