//! Homeroom session report model and DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{lenient_count, lenient_string};

/// One logged weekly homeroom session.
///
/// `present_students + absent_students == total_students` is expected but not
/// enforced; historical rows are accepted as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeroomReport {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub term: String,
    #[serde(deserialize_with = "lenient_string")]
    pub academic_year: String,
    #[serde(deserialize_with = "lenient_count")]
    pub week: u32,
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    /// May be a composite such as "ครูก และ ครูข" after a co-advisor merge
    #[serde(deserialize_with = "lenient_string")]
    pub advisor_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub department: String,
    #[serde(deserialize_with = "lenient_string")]
    pub class_level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub room: String,
    #[serde(deserialize_with = "lenient_string")]
    pub topic: String,
    #[serde(deserialize_with = "lenient_count")]
    pub total_students: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub present_students: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub absent_students: u32,
    /// Comma-joined photo URLs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub timestamp: String,
}

impl HomeroomReport {
    /// Whether any non-blank photo URL is attached.
    pub fn has_photos(&self) -> bool {
        self.photo_url
            .as_deref()
            .is_some_and(|urls| urls.split(',').any(|u| !u.trim().is_empty()))
    }
}

/// A report as submitted, before the store assigns `id` and `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NewHomeroomReport {
    #[serde(deserialize_with = "lenient_string")]
    pub term: String,
    #[serde(deserialize_with = "lenient_string")]
    pub academic_year: String,
    #[serde(deserialize_with = "lenient_count")]
    pub week: u32,
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub advisor_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub department: String,
    #[serde(deserialize_with = "lenient_string")]
    pub class_level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub room: String,
    #[serde(deserialize_with = "lenient_string")]
    pub topic: String,
    #[serde(deserialize_with = "lenient_count")]
    pub total_students: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub present_students: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub absent_students: u32,
    pub photo_url: Option<String>,
}

impl NewHomeroomReport {
    /// Attendance counts add up.
    pub fn is_consistent(&self) -> bool {
        self.present_students as u64 + self.absent_students as u64 == self.total_students as u64
    }

    /// Stamp with the store-assigned id and timestamp.
    pub fn into_report(self, id: String, timestamp: String) -> HomeroomReport {
        HomeroomReport {
            id,
            term: self.term,
            academic_year: self.academic_year,
            week: self.week,
            date: self.date,
            advisor_name: self.advisor_name,
            department: self.department,
            class_level: self.class_level,
            room: self.room,
            topic: self.topic,
            total_students: self.total_students,
            present_students: self.present_students,
            absent_students: self.absent_students,
            photo_url: self.photo_url.filter(|u| !u.trim().is_empty()),
            timestamp,
        }
    }
}

/// Query parameters shared by report listing endpoints.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub academic_year: String,
    pub advisor_name: Option<String>,
}

/// Response after saving a report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedReportResponse {
    pub id: String,
    /// Name actually stored (after co-advisor merge)
    pub advisor_name: String,
}
