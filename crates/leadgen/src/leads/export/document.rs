use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{optional_number, or_missing, ExportContext, ExportError};
use crate::leads::domain::ScoredLead;

const TITLE: &str = "Lead Generator - Export";
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 14.0;
const ROW_HEIGHT: f32 = 6.0;
const BODY_SIZE: f32 = 8.0;
const MISSING: &str = "N/A";

/// Column title, left offset in millimetres, and character budget.
const COLUMNS: [(&str, f32, usize); 7] = [
    ("Name", 14.0, 34),
    ("Address", 68.0, 48),
    ("Phone", 142.0, 20),
    ("Rating", 174.0, 7),
    ("Reviews", 188.0, 8),
    ("Website", 204.0, 36),
    ("Score", 268.0, 6),
];

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

pub(super) fn render(
    rows: &[&ScoredLead],
    context: &ExportContext,
) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Leads");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
    };

    let mut canvas = doc.get_page(page).get_layer(layer);
    canvas.use_text(TITLE, 16.0, Mm(MARGIN), Mm(PAGE_HEIGHT - 15.0), &fonts.bold);
    canvas.use_text(
        subtitle(context, rows.len()),
        10.0,
        Mm(MARGIN),
        Mm(PAGE_HEIGHT - 22.0),
        &fonts.regular,
    );

    let mut y = PAGE_HEIGHT - 32.0;
    draw_header(&canvas, &fonts, y);

    for lead in rows {
        y -= ROW_HEIGHT;
        if y < MARGIN {
            canvas = new_page(&doc);
            y = PAGE_HEIGHT - MARGIN;
            draw_header(&canvas, &fonts, y);
            y -= ROW_HEIGHT;
        }
        draw_row(&canvas, &fonts, y, lead);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn subtitle(context: &ExportContext, count: usize) -> String {
    format!(
        "Location: {} | Industry: {} | {} results | Generated {}",
        context.location.as_deref().unwrap_or("any"),
        context.industry.as_deref().unwrap_or("all"),
        count,
        context.generated_on
    )
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Leads");
    doc.get_page(page).get_layer(layer)
}

fn draw_header(canvas: &PdfLayerReference, fonts: &Fonts, y: f32) {
    for (title, x, _) in COLUMNS {
        canvas.use_text(title, BODY_SIZE, Mm(x), Mm(y), &fonts.bold);
    }
}

fn draw_row(canvas: &PdfLayerReference, fonts: &Fonts, y: f32, lead: &ScoredLead) {
    let rating = optional_number(lead.rating, MISSING);
    let reviews = optional_number(lead.user_ratings_total, MISSING);
    let score = format!("{} {}", lead.lead_score, lead.lead_label.label());
    let cells = [
        lead.name.as_str(),
        lead.address.as_str(),
        lead.phone.as_str(),
        rating.as_str(),
        reviews.as_str(),
        or_missing(&lead.website, MISSING),
        score.as_str(),
    ];

    for ((_, x, budget), cell) in COLUMNS.into_iter().zip(cells) {
        canvas.use_text(clip(cell, budget), BODY_SIZE, Mm(x), Mm(y), &fonts.regular);
    }
}

/// Builtin fonts have no wrapping; long values are cut to the column budget.
fn clip(value: &str, budget: usize) -> String {
    if value.chars().count() <= budget {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(budget.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

fn pdf_error(err: printpdf::Error) -> ExportError {
    ExportError::Pdf(format!("{err:?}"))
}
