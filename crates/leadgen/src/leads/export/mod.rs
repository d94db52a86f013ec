//! Serialization of scored leads into downloadable office formats.

mod delimited;
mod document;
mod spreadsheet;

use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::ScoredLead;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
    Xlsx,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "pdf" => Some(Self::Pdf),
            "xlsx" | "excel" => Some(Self::Xlsx),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "leads.csv",
            ExportFormat::Pdf => "leads.pdf",
            ExportFormat::Xlsx => "leads.xlsx",
        }
    }

    pub fn content_type(&self) -> String {
        match self {
            ExportFormat::Csv => mime::TEXT_CSV_UTF_8.to_string(),
            ExportFormat::Pdf => mime::APPLICATION_PDF.to_string(),
            ExportFormat::Xlsx => XLSX_MIME.to_string(),
        }
    }
}

/// Ids of the leads to export. An empty selection exports every lead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSelection {
    ids: Vec<String>,
}

impl ExportSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    fn apply<'a>(&self, leads: &'a [ScoredLead]) -> Vec<&'a ScoredLead> {
        if self.ids.is_empty() {
            return leads.iter().collect();
        }
        leads
            .iter()
            .filter(|lead| self.ids.iter().any(|id| *id == lead.id))
            .collect()
    }
}

/// Search parameters echoed in document headers.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub location: Option<String>,
    pub industry: Option<String>,
    pub generated_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: &'static str,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no leads selected for export")]
    NothingToExport,
    #[error("unable to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unable to flush export buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to build spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
    #[error("unable to build PDF: {0}")]
    Pdf(String),
}

pub fn export_leads(
    leads: &[ScoredLead],
    selection: &ExportSelection,
    format: ExportFormat,
    context: &ExportContext,
) -> Result<ExportedFile, ExportError> {
    let rows = selection.apply(leads);
    if rows.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let bytes = match format {
        ExportFormat::Csv => delimited::render(&rows)?,
        ExportFormat::Xlsx => spreadsheet::render(&rows)?,
        ExportFormat::Pdf => document::render(&rows, context)?,
    };

    Ok(ExportedFile {
        file_name: format.file_name(),
        content_type: format.content_type(),
        bytes,
    })
}

fn optional_number<T: ToString>(value: Option<T>, missing: &str) -> String {
    value
        .map(|inner| inner.to_string())
        .unwrap_or_else(|| missing.to_string())
}

fn or_missing<'a>(value: &'a str, missing: &'a str) -> &'a str {
    if value.is_empty() {
        missing
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::domain::PlaceCandidate;
    use crate::leads::scoring::score_candidate;

    fn lead(id: &str, name: &str) -> ScoredLead {
        let candidate = PlaceCandidate {
            id: id.to_string(),
            display_name: Some(name.to_string()),
            formatted_address: Some("1 Main St, Austin, TX".to_string()),
            national_phone: Some("(512) 555-0100".to_string()),
            rating: Some(4.4),
            user_rating_count: Some(31),
            ..PlaceCandidate::default()
        };
        let score = score_candidate(&candidate);
        ScoredLead::from_candidate(candidate, score)
    }

    fn context() -> ExportContext {
        ExportContext {
            location: Some("Austin, TX".to_string()),
            industry: Some("moving".to_string()),
            generated_on: NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date"),
        }
    }

    #[test]
    fn empty_selection_exports_everything() {
        let leads = vec![lead("a", "Alpha"), lead("b", "Bravo")];
        let file = export_leads(&leads, &ExportSelection::all(), ExportFormat::Csv, &context())
            .expect("csv export");
        let text = String::from_utf8(file.bytes).expect("utf8 csv");
        assert_eq!(text.lines().count(), 3);
        assert_eq!(file.file_name, "leads.csv");
        assert!(file.content_type.starts_with("text/csv"));
    }

    #[test]
    fn selection_limits_rows() {
        let leads = vec![lead("a", "Alpha"), lead("b", "Bravo")];
        let file = export_leads(
            &leads,
            &ExportSelection::only(["b"]),
            ExportFormat::Csv,
            &context(),
        )
        .expect("csv export");
        let text = String::from_utf8(file.bytes).expect("utf8 csv");
        assert!(text.contains("Bravo"));
        assert!(!text.contains("Alpha"));
    }

    #[test]
    fn nothing_to_export_is_an_error() {
        let leads = vec![lead("a", "Alpha")];
        let err = export_leads(
            &leads,
            &ExportSelection::only(["missing"]),
            ExportFormat::Pdf,
            &context(),
        )
        .expect_err("no rows selected");
        assert!(matches!(err, ExportError::NothingToExport));

        let err = export_leads(&[], &ExportSelection::all(), ExportFormat::Xlsx, &context())
            .expect_err("no leads at all");
        assert!(matches!(err, ExportError::NothingToExport));
    }

    #[test]
    fn spreadsheet_is_a_zip_container() {
        let leads = vec![lead("a", "Alpha")];
        let file = export_leads(&leads, &ExportSelection::all(), ExportFormat::Xlsx, &context())
            .expect("xlsx export");
        assert_eq!(&file.bytes[..2], b"PK");
        assert_eq!(file.file_name, "leads.xlsx");
    }

    #[test]
    fn pdf_paginates_long_exports() {
        let leads: Vec<ScoredLead> = (0..120)
            .map(|index| lead(&format!("id-{index}"), &format!("Mover {index}")))
            .collect();
        let file = export_leads(&leads, &ExportSelection::all(), ExportFormat::Pdf, &context())
            .expect("pdf export");
        assert!(file.bytes.starts_with(b"%PDF"));
        assert_eq!(file.content_type, "application/pdf");
    }

    #[test]
    fn parses_format_names() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("excel"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::parse("docx"), None);
    }
}
