//! Report aggregation: filtering, ordering, photo extraction and the
//! co-advisor merge applied when a report is saved.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Advisor, HomeroomReport, NewHomeroomReport, ReportQuery, SavedReportResponse};
use crate::services::url_normalizer::normalize_image_urls;
use crate::store::RecordStore;

/// Separator between names of advisors sharing one class.
pub const CO_ADVISOR_SEPARATOR: &str = " และ ";

/// Term/year scope plus an optional advisor name fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub term: String,
    pub academic_year: String,
    pub advisor_name: Option<String>,
}

impl ReportFilter {
    pub fn new(term: &str, academic_year: &str) -> Self {
        Self {
            term: term.trim().to_string(),
            academic_year: academic_year.trim().to_string(),
            advisor_name: None,
        }
    }

    pub fn with_advisor(mut self, name: &str) -> Self {
        self.advisor_name = Some(name.trim().to_string());
        self
    }

    /// True when an advisor name narrows the result.
    pub fn has_advisor(&self) -> bool {
        self.advisor_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Reject filters without a term or academic year.
    pub fn validate(&self) -> AppResult<()> {
        if self.term.is_empty() || self.academic_year.is_empty() {
            return Err(AppError::InvalidInput(
                "term and academicYear are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether one report falls inside this filter. Reports saved without
    /// a term or year are treated as belonging to every term/year.
    pub fn matches(&self, report: &HomeroomReport) -> bool {
        (report.academic_year.is_empty() || report.academic_year == self.academic_year)
            && (report.term.is_empty() || report.term == self.term)
            && advisor_matches(&report.advisor_name, self.advisor_name.as_deref())
    }
}

impl From<ReportQuery> for ReportFilter {
    fn from(query: ReportQuery) -> Self {
        let filter = Self::new(&query.term, &query.academic_year);
        match query.advisor_name {
            Some(name) => filter.with_advisor(&name),
            None => filter,
        }
    }
}

/// The one rule linking a report to an advisor: name containment.
///
/// Containment lets a merged name ("ครูก และ ครูข") match either advisor.
/// A blank or absent fragment matches every report.
pub fn advisor_matches(report_advisor: &str, wanted: Option<&str>) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(name) => report_advisor.contains(name),
    }
}

pub fn filter_reports(reports: &[HomeroomReport], filter: &ReportFilter) -> Vec<HomeroomReport> {
    reports.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// Ordering of a report listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOrder {
    /// Single-advisor history
    WeekAscending,
    /// Cross-advisor summary, newest first
    DateDescending,
}

/// Stable sort; ties keep store order.
pub fn sort_reports(reports: &mut [HomeroomReport], order: ReportOrder) {
    match order {
        ReportOrder::WeekAscending => reports.sort_by_key(|r| r.week),
        ReportOrder::DateDescending => reports.sort_by(|a, b| b.date.cmp(&a.date)),
    }
}

/// Every non-blank photo URL, in report order.
pub fn extract_photos(reports: &[HomeroomReport]) -> Vec<String> {
    reports
        .iter()
        .filter_map(|r| r.photo_url.as_deref())
        .flat_map(|urls| urls.split(','))
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

/// Name to store on a new report.
///
/// When several distinct advisors share the report's class assignment their
/// names are joined (store order, first occurrence wins); otherwise the
/// submitted name is kept.
pub fn merge_co_advisors(advisors: &[Advisor], report: &NewHomeroomReport) -> String {
    let mut names: Vec<&str> = Vec::new();
    for advisor in advisors
        .iter()
        .filter(|a| a.shares_class_with(&report.class_level, &report.room, &report.department))
    {
        let name = advisor.name.trim();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }

    if names.len() > 1 {
        names.join(CO_ADVISOR_SEPARATOR)
    } else {
        report.advisor_name.clone()
    }
}

pub fn find_advisor<'a>(advisors: &'a [Advisor], id: &str) -> Option<&'a Advisor> {
    advisors.iter().find(|a| a.id == id)
}

/// Report queries and saves on top of the record store.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<RecordStore>,
}

impl ReportService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Filtered reports: by week for one advisor, newest first otherwise.
    pub async fn history(&self, filter: &ReportFilter) -> AppResult<Vec<HomeroomReport>> {
        filter.validate()?;
        let mut reports = filter_reports(&self.store.get_reports().await, filter);
        let order = if filter.has_advisor() {
            ReportOrder::WeekAscending
        } else {
            ReportOrder::DateDescending
        };
        sort_reports(&mut reports, order);
        Ok(reports)
    }

    /// Normalized photo URLs of the filtered reports.
    pub async fn photos(&self, filter: &ReportFilter) -> AppResult<Vec<String>> {
        let reports = self.history(filter).await?;
        Ok(photos_of(&reports))
    }

    /// Every advisor's reports for one term, newest first.
    pub async fn summary(&self, term: &str, academic_year: &str) -> AppResult<Vec<HomeroomReport>> {
        self.history(&ReportFilter::new(term, academic_year)).await
    }

    /// Advisor by id across all years.
    pub async fn advisor(&self, id: &str) -> AppResult<Advisor> {
        let advisors = self.store.get_advisors(None).await;
        find_advisor(&advisors, id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Advisor '{}'", id)))
    }

    /// Merge co-advisors, persist, and return the stored id and name.
    pub async fn save_report(&self, mut report: NewHomeroomReport) -> AppResult<SavedReportResponse> {
        if report.term.trim().is_empty()
            || report.academic_year.trim().is_empty()
            || report.advisor_name.trim().is_empty()
        {
            return Err(AppError::InvalidInput(
                "term, academicYear and advisorName are required".to_string(),
            ));
        }

        if !report.is_consistent() {
            warn!(
                total = report.total_students,
                present = report.present_students,
                absent = report.absent_students,
                "Attendance counts do not add up for {}",
                report.advisor_name
            );
        }

        let advisors = self.store.get_advisors(None).await;
        let merged = merge_co_advisors(&advisors, &report);
        if merged != report.advisor_name {
            info!("Co-advisor merge: '{}' -> '{}'", report.advisor_name, merged);
            report.advisor_name = merged;
        }

        let advisor_name = report.advisor_name.clone();
        let id = self.store.save_report(report).await?;
        Ok(SavedReportResponse { id, advisor_name })
    }
}

/// Normalized photo URLs of already filtered reports.
pub fn photos_of(reports: &[HomeroomReport]) -> Vec<String> {
    extract_photos(reports)
        .iter()
        .flat_map(|u| normalize_image_urls(u))
        .collect()
}
