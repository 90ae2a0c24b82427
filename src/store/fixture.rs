//! In-memory fixture backend used when the sheet is not available.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RecordBackend, StoreError};
use crate::models::{Advisor, HomeroomReport};

/// In-memory advisors and reports.
pub struct FixtureStore {
    advisors: RwLock<Vec<Advisor>>,
    reports: RwLock<Vec<HomeroomReport>>,
}

impl FixtureStore {
    /// Fixture with the demo advisors used in development.
    pub fn seeded() -> Self {
        Self::new(seed_advisors(), Vec::new())
    }

    /// Fixture with no data.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn new(advisors: Vec<Advisor>, reports: Vec<HomeroomReport>) -> Self {
        Self {
            advisors: RwLock::new(advisors),
            reports: RwLock::new(reports),
        }
    }
}

fn seed_advisor(id: &str, name: &str, department: &str, class_level: &str, room: &str) -> Advisor {
    Advisor {
        id: id.to_string(),
        name: name.to_string(),
        year: 2568,
        department: department.to_string(),
        class_level: class_level.to_string(),
        room: room.to_string(),
    }
}

fn seed_advisors() -> Vec<Advisor> {
    vec![
        seed_advisor("1", "ครูสมชาย ใจดี", "เทคโนโลยีสารสนเทศ", "ปวช. 1", "1/1"),
        seed_advisor("1-2", "ครูสมชาย ใจดี", "เทคโนโลยีสารสนเทศ", "ปวช. 3", "1/3"),
        seed_advisor("2", "ครูนิภา รักเรียน", "เทคโนโลยีสารสนเทศ", "ปวช. 2", "1/2"),
        seed_advisor("3", "ครูวิชัย สอนเก่ง", "บัญชี", "ปวช. 1", "1/1"),
    ]
}

#[async_trait]
impl RecordBackend for FixtureStore {
    async fn get_advisors(&self, year: Option<i32>) -> Result<Vec<Advisor>, StoreError> {
        let advisors = self.advisors.read().await;
        Ok(advisors
            .iter()
            .filter(|a| year.is_none_or(|y| a.year == y))
            .cloned()
            .collect())
    }

    async fn add_advisor(&self, advisor: Advisor) -> Result<(), StoreError> {
        self.advisors.write().await.push(advisor);
        Ok(())
    }

    async fn update_advisor(&self, old_id: &str, advisor: Advisor) -> Result<(), StoreError> {
        let mut advisors = self.advisors.write().await;
        let slot = advisors
            .iter_mut()
            .find(|a| a.id == old_id)
            .ok_or_else(|| StoreError::RowNotFound(format!("Advisor '{}'", old_id)))?;
        *slot = advisor;
        Ok(())
    }

    async fn delete_advisor(&self, id: &str) -> Result<(), StoreError> {
        let mut advisors = self.advisors.write().await;
        let before = advisors.len();
        advisors.retain(|a| a.id != id);
        if advisors.len() == before {
            return Err(StoreError::RowNotFound(format!("Advisor '{}'", id)));
        }
        Ok(())
    }

    async fn save_report(&self, report: &HomeroomReport) -> Result<(), StoreError> {
        self.reports.write().await.push(report.clone());
        Ok(())
    }

    async fn get_reports(&self) -> Result<Vec<HomeroomReport>, StoreError> {
        Ok(self.reports.read().await.clone())
    }
}
