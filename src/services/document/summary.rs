use super::{COLLEGE_NAME, EMPTY_STATE, escape_html, paginate_rows};
use crate::models::HomeroomReport;

/// Reports per summary page; advisor and topic cells wrap to three lines.
pub const SUMMARY_ROWS_PER_PAGE: usize = 12;

const COLUMNS: [(&str, u8); 8] = [
    ("Date", 12),
    ("Week", 8),
    ("Advisor", 20),
    ("Dept", 15),
    ("Class", 10),
    ("Topic", 20),
    ("Stats", 10),
    ("Pic", 5),
];

/// Cross-advisor overview for one term, split over as many pages as the
/// rows need. Returns the number of pages written.
pub fn render_summary(
    html: &mut String,
    term: &str,
    academic_year: &str,
    reports: &[HomeroomReport],
) -> usize {
    let pages = paginate_rows(reports, SUMMARY_ROWS_PER_PAGE);

    for (page_index, rows) in pages.iter().enumerate() {
        html.push_str("<div class=\"page summary\">\n");
        html.push_str("<div class=\"center table-title\">สรุปรายงานการกิจกรรมโฮมรูม</div>\n");
        html.push_str(&format!(
            "<div class=\"center table-subtitle\">ภาคเรียนที่ {} ปีการศึกษา {}</div>\n",
            escape_html(term),
            escape_html(academic_year)
        ));
        if page_index == 0 {
            html.push_str(&format!(
                "<div class=\"center\" style=\"font-size: 16pt; margin-bottom: 20px;\">{}</div>\n",
                COLLEGE_NAME
            ));
        } else {
            html.push_str("<div class=\"center continued\">(ต่อ)</div>\n");
        }

        html.push_str("<table class=\"summary\">\n<thead><tr>");
        for (label, width) in COLUMNS {
            html.push_str(&format!("<th style=\"width: {}%\">{}</th>", width, label));
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        if rows.is_empty() {
            html.push_str(&format!(
                "<tr><td colspan=\"{}\" class=\"center\">{}</td></tr>\n",
                COLUMNS.len(),
                EMPTY_STATE
            ));
        }
        for r in rows.iter() {
            html.push_str(&format!(
                "<tr><td class=\"center\">{}</td><td class=\"center\">{}</td><td>{}</td>\
                 <td>{}</td><td class=\"center\">{} {}</td><td>{}</td>\
                 <td class=\"center\">{}/{}</td><td class=\"center\">{}</td></tr>\n",
                escape_html(&r.date),
                r.week,
                escape_html(&r.advisor_name),
                escape_html(&r.department),
                escape_html(&r.class_level),
                escape_html(&r.room),
                escape_html(&r.topic),
                r.present_students,
                r.total_students,
                if r.has_photos() { "Yes" } else { "No" }
            ));
        }

        html.push_str("</tbody>\n</table>\n</div>\n");
    }

    pages.len()
}
