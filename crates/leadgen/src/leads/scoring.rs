use serde::{Deserialize, Serialize};

use super::domain::PlaceCandidate;

const PHONE_POINTS: u8 = 2;
const WEBSITE_POINTS: u8 = 2;
const REVIEWS_POINTS: u8 = 1;
const HIGH_RATING_POINTS: u8 = 1;
const OPEN_NOW_POINTS: u8 = 1;

const HIGH_RATING_THRESHOLD: f64 = 4.0;
const HIGH_VOLUME_THRESHOLD: u32 = 50;
const MEDIUM_VOLUME_THRESHOLD: u32 = 20;

const HOT_THRESHOLD: u8 = 7;
const WARM_THRESHOLD: u8 = 4;

/// Highest score a candidate can reach.
pub const MAX_SCORE: u8 = 9;

/// Three-tier lead quality classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeadLabel {
    Cold,
    Warm,
    Hot,
}

impl LeadLabel {
    /// Bands are inclusive on their lower bound: 0-3 Cold, 4-6 Warm, 7-9 Hot.
    pub fn from_score(score: u8) -> Self {
        if score >= HOT_THRESHOLD {
            Self::Hot
        } else if score >= WARM_THRESHOLD {
            Self::Warm
        } else {
            Self::Cold
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadLabel::Hot => "Hot",
            LeadLabel::Warm => "Warm",
            LeadLabel::Cold => "Cold",
        }
    }
}

/// Review-volume tier. Counts above 50 are `High`, above 20 `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVolume {
    None,
    Medium,
    High,
}

impl ReviewVolume {
    fn from_count(count: Option<u32>) -> Self {
        match count {
            Some(count) if count > HIGH_VOLUME_THRESHOLD => Self::High,
            Some(count) if count > MEDIUM_VOLUME_THRESHOLD => Self::Medium,
            _ => Self::None,
        }
    }

    fn points(&self) -> u8 {
        match self {
            ReviewVolume::High => 2,
            ReviewVolume::Medium => 1,
            ReviewVolume::None => 0,
        }
    }
}

/// Signals derived from a candidate on every scoring pass; never stored on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub has_phone: bool,
    pub has_website: bool,
    pub has_reviews: bool,
    pub high_rating: bool,
    pub review_volume: ReviewVolume,
    pub currently_open: bool,
}

impl ScoreBreakdown {
    pub fn from_candidate(candidate: &PlaceCandidate) -> Self {
        Self {
            has_phone: candidate.has_phone(),
            has_website: candidate.has_website(),
            has_reviews: candidate.user_rating_count.is_some_and(|count| count > 0),
            high_rating: candidate
                .rating
                .is_some_and(|rating| rating > HIGH_RATING_THRESHOLD),
            review_volume: ReviewVolume::from_count(candidate.user_rating_count),
            currently_open: candidate.open_now == Some(true),
        }
    }

    /// Sum of the point contributions. The has-reviews point and the volume tier stack.
    pub fn points(&self) -> u8 {
        let mut score = 0;
        if self.has_phone {
            score += PHONE_POINTS;
        }
        if self.has_website {
            score += WEBSITE_POINTS;
        }
        if self.has_reviews {
            score += REVIEWS_POINTS;
        }
        if self.high_rating {
            score += HIGH_RATING_POINTS;
        }
        score += self.review_volume.points();
        if self.currently_open {
            score += OPEN_NOW_POINTS;
        }
        score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadScore {
    pub score: u8,
    pub label: LeadLabel,
    pub breakdown: ScoreBreakdown,
}

/// Pure scoring pass: the same candidate always yields the same score, label, and breakdown.
pub fn score_candidate(candidate: &PlaceCandidate) -> LeadScore {
    let breakdown = ScoreBreakdown::from_candidate(candidate);
    let score = breakdown.points();

    LeadScore {
        score,
        label: LeadLabel::from_score(score),
        breakdown,
    }
}
