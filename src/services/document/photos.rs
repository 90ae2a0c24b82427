use super::{COLLEGE_NAME, escape_html, paginate_rows};
use crate::models::PhotoLayout;

/// Split photos into consecutive pages of at most `per_page`.
pub fn paginate_photos(photos: &[String], per_page: usize) -> Vec<&[String]> {
    if photos.is_empty() {
        return Vec::new();
    }
    paginate_rows(photos, per_page)
}

/// Photo pages with captions numbered continuously across pages.
/// Writes nothing when there are no photos.
pub fn render_photo_pages(
    html: &mut String,
    term: &str,
    academic_year: &str,
    photos: &[String],
    layout: PhotoLayout,
) {
    let per_page = layout.per_page();
    let grid_class = match layout {
        PhotoLayout::Four => "photo-grid",
        PhotoLayout::Six => "photo-grid six",
    };

    for (page_index, page) in paginate_photos(photos, per_page).into_iter().enumerate() {
        html.push_str("<div class=\"page photos\">\n");
        html.push_str(
            "<div class=\"center table-title\">ภาพการจัดกิจกรรมโฮมรูม ของครูที่ปรึกษาและนักเรียน นักศึกษา</div>\n",
        );
        html.push_str(&format!(
            "<div class=\"center table-subtitle\">ภาคเรียนที่ {}/{} {}</div>\n",
            escape_html(term),
            escape_html(academic_year),
            COLLEGE_NAME
        ));
        if page_index > 0 {
            html.push_str("<div class=\"center continued\">(ต่อ)</div>\n");
        }

        html.push_str(&format!("<div class=\"{}\">\n", grid_class));
        for (i, url) in page.iter().enumerate() {
            html.push_str(&format!(
                "<div class=\"photo-item\"><div class=\"photo-img-box\">\
                 <img src=\"{}\" class=\"photo-img\"></div>\
                 <div class=\"photo-caption\">รูปที่ {}</div></div>\n",
                escape_html(url),
                page_index * per_page + i + 1
            ));
        }
        html.push_str("</div>\n</div>\n");
    }
}
