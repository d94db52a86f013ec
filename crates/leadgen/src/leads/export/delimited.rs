use super::{optional_number, ExportError};
use crate::leads::domain::ScoredLead;

const HEADERS: [&str; 9] = [
    "Name",
    "Address",
    "Phone",
    "Rating",
    "Reviews",
    "Website",
    "Google Maps",
    "Score",
    "Label",
];

pub(super) fn render(rows: &[&ScoredLead]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for lead in rows {
        writer.write_record([
            lead.name.as_str(),
            lead.address.as_str(),
            lead.phone.as_str(),
            optional_number(lead.rating, "").as_str(),
            optional_number(lead.user_ratings_total, "").as_str(),
            lead.website.as_str(),
            lead.maps_url.as_str(),
            lead.lead_score.to_string().as_str(),
            lead.lead_label.label(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
