use tracing::warn;

use super::domain::LocationSuggestion;
use super::provider::PlacesProvider;

/// Inputs shorter than this are not worth an upstream call.
pub const MIN_INPUT_CHARS: usize = 2;

/// Suggest locations for a partial input. Upstream failures yield no suggestions.
pub async fn suggest<P>(provider: &P, input: &str) -> Vec<LocationSuggestion>
where
    P: PlacesProvider + ?Sized,
{
    if input.chars().count() < MIN_INPUT_CHARS {
        return Vec::new();
    }

    match provider.autocomplete(input).await {
        Ok(suggestions) => suggestions,
        Err(err) => {
            warn!(error = %err, "location autocomplete failed");
            Vec::new()
        }
    }
}
