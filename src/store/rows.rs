//! Mapping between sheet rows and typed records.
//!
//! Rows are keyed by the header row, so column order in the live sheet does
//! not matter. Cells that are missing or malformed map to empty strings and
//! zero counts; nothing is rejected on read.

use serde_json::Value;

use crate::models::{Advisor, HomeroomReport, current_buddhist_year, parse_count};

/// Advisor sheet headers (as typed by staff in the live sheet).
pub mod advisor_headers {
    pub const ID: &str = "id";
    pub const NAME: &str = "ครูที่ปรึกษา";
    pub const CLASS_LEVEL: &str = "ระดับชั้น";
    pub const ROOM: &str = "ห้อง";
    pub const DEPARTMENT: &str = "สาขาวิชา";
    pub const YEAR: &str = "ปีการศึกษา";
}

/// Header row written when the advisor tab has to be created.
pub const ADVISOR_HEADERS: [&str; 5] = [
    advisor_headers::NAME,
    advisor_headers::CLASS_LEVEL,
    advisor_headers::ROOM,
    advisor_headers::DEPARTMENT,
    advisor_headers::YEAR,
];

/// Report sheet header row, in write order.
pub const REPORT_HEADERS: [&str; 15] = [
    "id",
    "term",
    "academicYear",
    "week",
    "date",
    "advisorName",
    "department",
    "classLevel",
    "room",
    "topic",
    "totalStudents",
    "presentStudents",
    "absentStudents",
    "photoUrl",
    "timestamp",
];

/// A sheet read as a header row plus data rows.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Split raw values into header and data rows.
    pub fn from_values(mut values: Vec<Vec<String>>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let headers = values
            .remove(0)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        Self {
            headers,
            rows: values,
        }
    }

    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Trimmed cell value, empty when the column or cell is absent.
    pub fn cell<'a>(&self, row: &'a [String], header: &str) -> &'a str {
        self.column(header)
            .and_then(|idx| row.get(idx))
            .map(|v| v.trim())
            .unwrap_or("")
    }

    /// 1-based sheet row number of data row `index`.
    pub fn sheet_row_number(index: usize) -> usize {
        index + 2
    }
}

/// Render a cell from the Sheets API as text.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Advisors in sheet order. Rows carrying a year are kept only when they
/// match `year`; rows without one take the requested (or current) year.
pub fn advisors_from_table(table: &SheetTable, year: Option<i32>) -> Vec<Advisor> {
    let fallback_year = year.unwrap_or_else(current_buddhist_year);

    table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let name = table.cell(row, advisor_headers::NAME);
            let class_level = table.cell(row, advisor_headers::CLASS_LEVEL);
            let room = table.cell(row, advisor_headers::ROOM);
            let department = table.cell(row, advisor_headers::DEPARTMENT);

            let row_year = table.cell(row, advisor_headers::YEAR).parse::<i32>().ok();
            if let (Some(wanted), Some(found)) = (year, row_year)
                && wanted != found
            {
                return None;
            }

            let explicit_id = table.cell(row, advisor_headers::ID);
            let id = if explicit_id.is_empty() {
                Advisor::derive_id(name, class_level, room, index)
            } else {
                explicit_id.to_string()
            };

            Some(Advisor {
                id,
                name: name.to_string(),
                year: row_year.unwrap_or(fallback_year),
                department: department.to_string(),
                class_level: class_level.to_string(),
                room: room.to_string(),
            })
        })
        .collect()
}

/// Index of the data row holding advisor `id`.
pub fn find_advisor_row(table: &SheetTable, id: &str) -> Option<usize> {
    table.rows.iter().enumerate().position(|(index, row)| {
        let explicit_id = table.cell(row, advisor_headers::ID);
        let row_id = if explicit_id.is_empty() {
            Advisor::derive_id(
                table.cell(row, advisor_headers::NAME),
                table.cell(row, advisor_headers::CLASS_LEVEL),
                table.cell(row, advisor_headers::ROOM),
                index,
            )
        } else {
            explicit_id.to_string()
        };
        row_id == id
    })
}

/// Advisor as a row laid out under `headers`. Columns this server does not
/// know keep their value from `existing` (blank for a new row).
pub fn advisor_to_row(
    headers: &[String],
    advisor: &Advisor,
    existing: Option<&[String]>,
) -> Vec<Value> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| match header.as_str() {
            advisor_headers::ID => Value::from(advisor.id.clone()),
            advisor_headers::NAME => Value::from(advisor.name.clone()),
            advisor_headers::CLASS_LEVEL => Value::from(advisor.class_level.clone()),
            advisor_headers::ROOM => Value::from(advisor.room.clone()),
            advisor_headers::DEPARTMENT => Value::from(advisor.department.clone()),
            advisor_headers::YEAR => Value::from(advisor.year),
            _ => Value::from(
                existing
                    .and_then(|row| row.get(idx))
                    .cloned()
                    .unwrap_or_default(),
            ),
        })
        .collect()
}

/// Reports in sheet order.
pub fn reports_from_table(table: &SheetTable) -> Vec<HomeroomReport> {
    table
        .rows
        .iter()
        .map(|row| {
            let text = |header: &str| table.cell(row, header).to_string();
            let photo_url = text("photoUrl");
            HomeroomReport {
                id: text("id"),
                term: text("term"),
                academic_year: text("academicYear"),
                week: parse_count(table.cell(row, "week")),
                date: text("date"),
                advisor_name: text("advisorName"),
                department: text("department"),
                class_level: text("classLevel"),
                room: text("room"),
                topic: text("topic"),
                total_students: parse_count(table.cell(row, "totalStudents")),
                present_students: parse_count(table.cell(row, "presentStudents")),
                absent_students: parse_count(table.cell(row, "absentStudents")),
                photo_url: (!photo_url.is_empty()).then_some(photo_url),
                timestamp: text("timestamp"),
            }
        })
        .collect()
}

/// Report laid out in `REPORT_HEADERS` order.
pub fn report_to_row(report: &HomeroomReport) -> Vec<Value> {
    vec![
        Value::from(report.id.clone()),
        Value::from(report.term.clone()),
        Value::from(report.academic_year.clone()),
        Value::from(report.week),
        Value::from(report.date.clone()),
        Value::from(report.advisor_name.clone()),
        Value::from(report.department.clone()),
        Value::from(report.class_level.clone()),
        Value::from(report.room.clone()),
        Value::from(report.topic.clone()),
        Value::from(report.total_students),
        Value::from(report.present_students),
        Value::from(report.absent_students),
        Value::from(report.photo_url.clone().unwrap_or_default()),
        Value::from(report.timestamp.clone()),
    ]
}

/// Tab holding one term's copy of every report, e.g. `2/2568`.
pub fn term_sheet_title(report: &HomeroomReport) -> String {
    format!("{}/{}", report.term, report.academic_year)
}
