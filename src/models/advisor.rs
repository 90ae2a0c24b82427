//! Advisor (homeroom teacher) model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A homeroom teacher assignment, scoped to department/class/room.
///
/// The same teacher may appear several times (one record per room); `id`
/// is the unique key within a listing, never `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Advisor {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub department: String,
    pub class_level: String,
    pub room: String,
}

impl Advisor {
    /// Derive the listing id used when the sheet has no `id` column.
    ///
    /// `name-classLevel-room` with every whitespace run replaced by `-`.
    /// Only stable while name/level/room don't collide across distinct
    /// people; two identical assignments get the same id.
    pub fn derive_id(name: &str, class_level: &str, room: &str, row_index: usize) -> String {
        if name.is_empty() && class_level.is_empty() && room.is_empty() {
            return format!("generated-{}", row_index);
        }
        format!("{}-{}-{}", name, class_level, room)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    /// True when both records describe the same class assignment.
    pub fn shares_class_with(&self, class_level: &str, room: &str, department: &str) -> bool {
        self.class_level.trim() == class_level.trim()
            && self.room.trim() == room.trim()
            && self.department.trim() == department.trim()
    }
}

/// Body for creating or editing an advisor.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorInput {
    pub name: String,
    pub department: String,
    pub class_level: String,
    pub room: String,
    /// Academic year; defaults to the current Buddhist-era year
    #[serde(default)]
    pub year: Option<i32>,
}

impl AdvisorInput {
    /// Reject records the sheet could not key.
    pub fn validate(&self) -> Result<(), String> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.room.trim().is_empty() {
            missing.push("room");
        }
        if self.department.trim().is_empty() {
            missing.push("department");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("Missing required field(s): {}", missing.join(", ")))
        }
    }

    /// Build the stored record, deriving its id from the content.
    pub fn into_advisor(self, default_year: i32) -> Advisor {
        let name = self.name.trim().to_string();
        let class_level = self.class_level.trim().to_string();
        let room = self.room.trim().to_string();
        Advisor {
            id: Advisor::derive_id(&name, &class_level, &room, 0),
            name,
            year: self.year.unwrap_or(default_year),
            department: self.department.trim().to_string(),
            class_level,
            room,
        }
    }
}

/// Query parameters for listing advisors.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AdvisorQuery {
    pub year: Option<i32>,
}
