use rust_xlsxwriter::{Format, Workbook};

use super::{or_missing, ExportError};
use crate::leads::domain::ScoredLead;

const SHEET_NAME: &str = "Leads";
const MISSING: &str = "N/A";

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

const COLUMN_WIDTHS: [f64; 9] = [32.0, 44.0, 18.0, 8.0, 9.0, 36.0, 36.0, 7.0, 7.0];

pub(super) fn render(rows: &[&ScoredLead]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, width)?;
    }

    for (index, lead) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, &lead.name)?;
        sheet.write_string(row, 1, &lead.address)?;
        sheet.write_string(row, 2, &lead.phone)?;
        match lead.rating {
            Some(rating) => sheet.write_number(row, 3, rating)?,
            None => sheet.write_string(row, 3, MISSING)?,
        };
        match lead.user_ratings_total {
            Some(total) => sheet.write_number(row, 4, f64::from(total))?,
            None => sheet.write_string(row, 4, MISSING)?,
        };
        sheet.write_string(row, 5, or_missing(&lead.website, MISSING))?;
        sheet.write_string(row, 6, &lead.maps_url)?;
        sheet.write_number(row, 7, f64::from(lead.lead_score))?;
        sheet.write_string(row, 8, lead.lead_label.label())?;
    }

    Ok(workbook.save_to_buffer()?)
}
