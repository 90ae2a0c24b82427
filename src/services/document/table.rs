use super::{COLLEGE_NAME, EMPTY_STATE, escape_html, paginate_rows};
use crate::models::{AdvisorInfo, HomeroomReport};

/// Sessions per attendance page. Each row is two lines tall at 16pt.
pub const ATTENDANCE_ROWS_PER_PAGE: usize = 8;

/// Attendance log for one advisor, one row per session, split over as many
/// pages as the rows need. Returns the number of pages written.
pub fn render_attendance_table(
    html: &mut String,
    term: &str,
    academic_year: &str,
    advisor: &AdvisorInfo,
    reports: &[HomeroomReport],
) -> usize {
    let pages = paginate_rows(reports, ATTENDANCE_ROWS_PER_PAGE);

    for (page_index, rows) in pages.iter().enumerate() {
        html.push_str("<div class=\"page attendance\">\n");
        html.push_str(&format!(
            "<div class=\"center table-title\">แบบบันทึกกิจกรรมโฮมรูม ภาคเรียนที่ {}/{}</div>\n",
            escape_html(term),
            escape_html(academic_year)
        ));
        html.push_str(&format!(
            "<div class=\"center table-subtitle\">{}</div>\n",
            COLLEGE_NAME
        ));

        if page_index == 0 {
            html.push_str("<div class=\"header-info\">\n<div class=\"header-row\">");
            html.push_str(&format!(
                "<span>ระดับชั้น {}</span><span>สาขาวิชา {}</span><span>ห้อง {}</span>",
                escape_html(&advisor.class_level),
                escape_html(&advisor.department),
                escape_html(&advisor.room)
            ));
            html.push_str(&format!(
                "</div>\n<div style=\"margin-top: 10px;\">ครูที่ปรึกษา {}</div>\n</div>\n",
                escape_html(&advisor.name)
            ));
        } else {
            html.push_str(&format!(
                "<div class=\"center continued\">{} (ต่อ)</div>\n",
                escape_html(&advisor.name)
            ));
        }

        html.push_str(
            "<table>\n<thead><tr>\
             <th style=\"width: 20%\">สัปดาห์ที่<br>วัน/เวลา</th>\
             <th>เรื่องที่อบรม</th>\
             <th style=\"width: 10%\">ทั้งหมด</th>\
             <th style=\"width: 10%\">มา</th>\
             <th style=\"width: 10%\">ขาด</th>\
             </tr></thead>\n<tbody>\n",
        );

        if rows.is_empty() {
            html.push_str(&format!(
                "<tr><td colspan=\"5\" class=\"center\">{}</td></tr>\n",
                EMPTY_STATE
            ));
        }
        for report in rows.iter() {
            html.push_str(&attendance_row(report));
        }

        html.push_str("</tbody>\n</table>\n</div>\n");
    }

    pages.len()
}

/// One `<tr>` of the attendance table.
pub fn attendance_row(report: &HomeroomReport) -> String {
    format!(
        "<tr><td class=\"center\">Week {}<br><span class=\"date\">{}</span></td>\
         <td>{}</td><td class=\"center\">{}</td><td class=\"center\">{}</td>\
         <td class=\"center\">{}</td></tr>\n",
        report.week,
        escape_html(&report.date),
        escape_html(&report.topic),
        report.total_students,
        report.present_students,
        report.absent_students
    )
}
