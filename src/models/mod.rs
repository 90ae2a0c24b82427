//! Domain models for homeroom records and PDF requests.

pub mod advisor;
pub mod homeroom_report;
pub mod pdf_request;

pub use advisor::{Advisor, AdvisorInput, AdvisorQuery};
pub use homeroom_report::{HomeroomReport, NewHomeroomReport, ReportQuery, SavedReportResponse};
pub use pdf_request::{AdvisorInfo, PdfData, PdfMode, PdfRequest, PhotoLayout};

use chrono::Datelike;
use serde::{Deserialize, Deserializer};

/// Offset between the Gregorian and Thai Buddhist-era calendars.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Current academic calendar year in Buddhist era (e.g. 2568).
pub fn current_buddhist_year() -> i32 {
    chrono::Utc::now().year() + BUDDHIST_ERA_OFFSET
}

/// Parse a count the way historical sheet rows need it: trimmed digits,
/// anything else becomes zero.
pub fn parse_count(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u32>() {
        return n;
    }
    // Sheets may hand back "28.0" for numbers typed into a formatted cell
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => f as u32,
        _ => 0,
    }
}

/// Deserialize a count from a number, numeric string, empty string or null.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .map(|v| v.min(u32::MAX as u64) as u32)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u32))
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => parse_count(&s),
        _ => 0,
    })
}

/// Deserialize a string field that may arrive as a number (e.g. `"term": 2`).
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
