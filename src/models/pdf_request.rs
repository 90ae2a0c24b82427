//! PDF generation request DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Advisor, HomeroomReport, lenient_string};

/// Which layout(s) the generated document contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PdfMode {
    Cover,
    Table,
    Photos,
    Summary,
    All,
}

impl PdfMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Table => "table",
            Self::Photos => "photos",
            Self::Summary => "summary",
            Self::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cover" => Some(Self::Cover),
            "table" => Some(Self::Table),
            "photos" => Some(Self::Photos),
            "summary" => Some(Self::Summary),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Modes whose pages print the advisor's identity.
    pub fn requires_advisor(&self) -> bool {
        matches!(self, Self::Cover | Self::Table | Self::All)
    }

    pub fn prints_photos(&self) -> bool {
        matches!(self, Self::Photos | Self::All)
    }
}

impl std::fmt::Display for PdfMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Photo grid variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhotoLayout {
    /// 2 x 2 grid
    #[default]
    #[serde(alias = "4")]
    Four,
    /// 2 x 3 grid
    #[serde(alias = "6")]
    Six,
}

impl PhotoLayout {
    pub fn per_page(&self) -> usize {
        match self {
            Self::Four => 4,
            Self::Six => 6,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "four" | "4" => Some(Self::Four),
            "six" | "6" => Some(Self::Six),
            _ => None,
        }
    }
}

/// Advisor identity printed on the cover and table header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub class_level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub room: String,
    #[serde(deserialize_with = "lenient_string")]
    pub department: String,
}

impl From<&Advisor> for AdvisorInfo {
    fn from(advisor: &Advisor) -> Self {
        Self {
            name: advisor.name.clone(),
            class_level: advisor.class_level.clone(),
            room: advisor.room.clone(),
            department: advisor.department.clone(),
        }
    }
}

/// Document data supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfData {
    #[serde(deserialize_with = "lenient_string")]
    pub term: String,
    #[serde(deserialize_with = "lenient_string")]
    pub academic_year: String,
    pub advisor: Option<AdvisorInfo>,
    pub reports: Vec<HomeroomReport>,
    /// Image URLs or `data:` URIs, in caption order
    pub photos: Vec<String>,
    pub photo_layout: PhotoLayout,
}

/// Body of `POST /pdf`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PdfRequest {
    pub mode: PdfMode,
    pub data: PdfData,
}
