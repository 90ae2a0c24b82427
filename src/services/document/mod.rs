//! HTML document assembly for the printable homeroom report.
//!
//! A document is a sequence of A4 `.page` blocks. Tables and photo grids
//! are split into as many pages as their rows need, each repeating its
//! heading. Every value
//! taken from a request or the record store is HTML-escaped before it is
//! interpolated; photo URLs are normalized first.

mod cover;
mod photos;
mod styles;
mod summary;
mod table;

pub use photos::paginate_photos;
pub use summary::SUMMARY_ROWS_PER_PAGE;
pub use table::{ATTENDANCE_ROWS_PER_PAGE, attendance_row};

use crate::error::{AppError, AppResult};
use crate::models::{PdfData, PdfMode};
use crate::services::assets::DocumentAssets;
use crate::services::url_normalizer::normalize_image_url;

pub(crate) const COLLEGE_NAME: &str = "วิทยาลัยอาชีวศึกษาสุโขทัย";

/// Text of the single row shown by an empty table.
pub(crate) const EMPTY_STATE: &str = "ไม่พบรายงาน";

/// An assembled document ready for printing.
#[derive(Debug, Clone)]
pub struct Document {
    pub html: String,
    pub page_count: usize,
}

/// Split rows into consecutive pages of at most `per_page`. An empty input
/// still yields one empty page so the table prints its placeholder row.
pub(crate) fn paginate_rows<T>(rows: &[T], per_page: usize) -> Vec<&[T]> {
    if rows.is_empty() {
        return vec![rows];
    }
    rows.chunks(per_page.max(1)).collect()
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the HTML for `mode`.
///
/// Fails with `InvalidInput` when the mode needs an advisor and none was
/// given, or when the document would have no pages at all.
pub fn assemble_document(
    mode: PdfMode,
    data: &PdfData,
    assets: &DocumentAssets,
) -> AppResult<Document> {
    let advisor = match (mode.requires_advisor(), data.advisor.as_ref()) {
        (true, None) => {
            return Err(AppError::InvalidInput(format!(
                "advisor is required for mode '{}'",
                mode
            )));
        }
        (_, advisor) => advisor,
    };

    let photos: Vec<String> = data
        .photos
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(normalize_image_url)
        .collect();

    let mut body = String::new();
    let mut page_count = 0;

    if mode == PdfMode::Summary {
        page_count +=
            summary::render_summary(&mut body, &data.term, &data.academic_year, &data.reports);
    }

    if let Some(advisor) = advisor {
        if matches!(mode, PdfMode::Cover | PdfMode::All) {
            cover::render_cover(
                &mut body,
                &data.term,
                &data.academic_year,
                advisor,
                assets.logo.as_deref(),
            );
            page_count += 1;
        }
        if matches!(mode, PdfMode::Table | PdfMode::All) {
            page_count += table::render_attendance_table(
                &mut body,
                &data.term,
                &data.academic_year,
                advisor,
                &data.reports,
            );
        }
    }

    if matches!(mode, PdfMode::Photos | PdfMode::All) {
        photos::render_photo_pages(
            &mut body,
            &data.term,
            &data.academic_year,
            &photos,
            data.photo_layout,
        );
        page_count += paginate_photos(&photos, data.photo_layout.per_page()).len();
    }

    if page_count == 0 {
        return Err(AppError::InvalidInput(format!(
            "nothing to print for mode '{}'",
            mode
        )));
    }

    let mut html = String::with_capacity(body.len() + 4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"th\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Homeroom Report</title>\n");
    html.push_str(&styles::stylesheet(assets.fonts.as_deref()));
    html.push_str("</head>\n<body>\n");
    html.push_str(&body);
    html.push_str("</body>\n</html>\n");

    Ok(Document { html, page_count })
}
