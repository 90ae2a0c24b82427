use super::{COLLEGE_NAME, escape_html};
use crate::models::AdvisorInfo;

const FOOTER_LINES: [&str; 3] = [
    "วิทยาลัยอาชีวศึกษาสุโขทัย สถาบันการอาชีวศึกษาภาคเหนือ 3",
    "สำนักงานอาชีวศึกษาจังหวัดสุโขทัย",
    "สำนักงานคณะกรรมการการอาชีวศึกษา กระทรวงศึกษาธิการ",
];

/// Cover page: report title, term, advisor identity and institution footer.
pub fn render_cover(
    html: &mut String,
    term: &str,
    academic_year: &str,
    advisor: &AdvisorInfo,
    logo: Option<&str>,
) {
    html.push_str("<div class=\"page cover\">\n");

    if let Some(logo) = logo {
        html.push_str(&format!(
            "<img class=\"cover-logo\" src=\"{}\" alt=\"{}\">\n",
            escape_html(logo),
            COLLEGE_NAME
        ));
    }

    html.push_str(
        "<div class=\"center cover-title\">รายงานการบันทึกกิจกรรมโฮมรูม (HOME ROOM)</div>\n",
    );
    html.push_str(&format!(
        "<div class=\"center cover-subtitle\">ภาคเรียนที่ {} ปีการศึกษา {}</div>\n",
        escape_html(term),
        escape_html(academic_year)
    ));
    html.push_str("<div class=\"center cover-label\">จัดทำโดย</div>\n");
    html.push_str(&format!(
        "<div class=\"center cover-name\">{}</div>\n",
        escape_html(&advisor.name)
    ));
    html.push_str(&format!(
        "<div class=\"center cover-info\">ครูที่ปรึกษา ระดับชั้น/ปีที่ \
         <span class=\"bold\">{}</span> ห้อง <span class=\"bold\">{}</span></div>\n",
        escape_html(&advisor.class_level),
        escape_html(&advisor.room)
    ));
    html.push_str(&format!(
        "<div class=\"center cover-dept\">สาขาวิชา {}</div>\n",
        escape_html(&advisor.department)
    ));

    html.push_str("<div class=\"cover-footer\">\n");
    for line in FOOTER_LINES {
        html.push_str(&format!("<div>{}</div>\n", line));
    }
    html.push_str("</div>\n</div>\n");
}
