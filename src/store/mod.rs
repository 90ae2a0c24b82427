//! Record store adapter.
//!
//! Advisors and homeroom reports live in a Google Sheet. When credentials
//! are absent, or the sheet cannot be reached, the adapter serves an
//! in-memory fixture set instead so the rest of the server keeps working.
//!
//! Policy:
//! - Reads degrade to fixture data on any sheet error (logged).
//! - Writes against a connected sheet propagate their error.
//! - A failed connection attempt is retried on the next call.
//! - One connection attempt runs at a time. Reads arriving meanwhile are
//!   served from fixture data; writes wait for the attempt to finish.

pub mod fixture;
pub mod rows;
pub mod service_account;
pub mod sheets;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::SheetSettings;
use crate::models::{Advisor, HomeroomReport, NewHomeroomReport};

pub use fixture::FixtureStore;
pub use sheets::{GoogleEndpoints, SheetsStore};

/// HTTP connect timeout for Google APIs.
const GOOGLE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP total timeout for Google APIs.
const GOOGLE_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Record store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Service account authentication failed: {0}")]
    Auth(String),

    #[error("Sheet '{0}' does not exist")]
    MissingSheet(String),

    #[error("{0} not found")]
    RowNotFound(String),
}

/// Which backend is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    Sheets,
    Fixture,
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sheets => write!(f, "sheets"),
            Self::Fixture => write!(f, "fixture"),
        }
    }
}

/// Operations every backing store provides.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Advisors, optionally restricted to one academic year.
    async fn get_advisors(&self, year: Option<i32>) -> Result<Vec<Advisor>, StoreError>;

    async fn add_advisor(&self, advisor: Advisor) -> Result<(), StoreError>;

    /// Overwrite the advisor currently keyed by `old_id`.
    async fn update_advisor(&self, old_id: &str, advisor: Advisor) -> Result<(), StoreError>;

    async fn delete_advisor(&self, id: &str) -> Result<(), StoreError>;

    /// Persist a fully stamped report.
    async fn save_report(&self, report: &HomeroomReport) -> Result<(), StoreError>;

    async fn get_reports(&self) -> Result<Vec<HomeroomReport>, StoreError>;
}

enum ConnectionState {
    /// Credentials present, no successful connection yet.
    Pending,
    Connected(Arc<SheetsStore>),
    /// No credentials: fixture mode for the process lifetime.
    Fixture,
}

/// Adapter choosing between the sheet and the fixture backend.
pub struct RecordStore {
    settings: Option<SheetSettings>,
    endpoints: GoogleEndpoints,
    http: reqwest::Client,
    state: RwLock<ConnectionState>,
    /// Held by the connection attempt in flight
    connecting: Mutex<()>,
    fixture: FixtureStore,
}

impl RecordStore {
    /// Create an adapter; `None` settings means fixture mode.
    pub fn new(settings: Option<SheetSettings>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(GOOGLE_CONNECT_TIMEOUT)
            .timeout(GOOGLE_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client for Google APIs: {}", e);
                reqwest::Client::new()
            });

        let state = if settings.is_some() {
            ConnectionState::Pending
        } else {
            ConnectionState::Fixture
        };

        Self {
            settings,
            endpoints: GoogleEndpoints::default(),
            http,
            state: RwLock::new(state),
            connecting: Mutex::new(()),
            fixture: FixtureStore::seeded(),
        }
    }

    /// Point the adapter at alternative Google endpoints.
    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Fixture-only adapter over the given data.
    pub fn with_fixture(fixture: FixtureStore) -> Self {
        Self {
            settings: None,
            endpoints: GoogleEndpoints::default(),
            http: reqwest::Client::new(),
            state: RwLock::new(ConnectionState::Fixture),
            connecting: Mutex::new(()),
            fixture,
        }
    }

    /// Establish the sheet session. Idempotent; never fails.
    pub async fn connect(&self) {
        self.sheets(true).await;
    }

    /// Current backend mode.
    pub async fn mode(&self) -> StoreMode {
        match self.sheets(false).await {
            Some(_) => StoreMode::Sheets,
            None => StoreMode::Fixture,
        }
    }

    /// `Some` once the backend is decided, `None` while still pending.
    async fn settled(&self) -> Option<Option<Arc<SheetsStore>>> {
        match &*self.state.read().await {
            ConnectionState::Connected(store) => Some(Some(store.clone())),
            ConnectionState::Fixture => Some(None),
            ConnectionState::Pending => None,
        }
    }

    /// Connected sheet backend, connecting first if needed. With `wait`
    /// unset, a caller that finds another attempt in flight gets `None`
    /// instead of queueing behind it.
    async fn sheets(&self, wait: bool) -> Option<Arc<SheetsStore>> {
        if let Some(backend) = self.settled().await {
            return backend;
        }

        let _attempt = if wait {
            self.connecting.lock().await
        } else {
            match self.connecting.try_lock() {
                Ok(guard) => guard,
                Err(_) => {
                    debug!("Sheet connection attempt in flight, serving fixture data");
                    return None;
                }
            }
        };

        // An attempt may have finished while this caller waited
        if let Some(backend) = self.settled().await {
            return backend;
        }

        let settings = self.settings.as_ref()?;
        match SheetsStore::connect(settings, &self.endpoints, self.http.clone()).await {
            Ok(store) => {
                info!(sheet_id = %settings.sheet_id, "Connected to Google Sheets");
                let store = Arc::new(store);
                *self.state.write().await = ConnectionState::Connected(store.clone());
                Some(store)
            }
            Err(e) => {
                error!("Failed to connect to Google Sheets, serving fixture data: {}", e);
                None
            }
        }
    }

    pub async fn get_advisors(&self, year: Option<i32>) -> Vec<Advisor> {
        if let Some(sheets) = self.sheets(false).await {
            match sheets.get_advisors(year).await {
                Ok(advisors) => return advisors,
                Err(StoreError::MissingSheet(title)) => {
                    warn!("Sheet '{}' not found. Using fixture advisors.", title);
                }
                Err(e) => error!("Error fetching advisors, using fixture data: {}", e),
            }
        }
        self.fixture.get_advisors(year).await.unwrap_or_default()
    }

    pub async fn add_advisor(&self, advisor: Advisor) -> Result<(), StoreError> {
        match self.sheets(true).await {
            Some(sheets) => sheets.add_advisor(advisor).await,
            None => self.fixture.add_advisor(advisor).await,
        }
    }

    pub async fn update_advisor(&self, old_id: &str, advisor: Advisor) -> Result<(), StoreError> {
        match self.sheets(true).await {
            Some(sheets) => sheets.update_advisor(old_id, advisor).await,
            None => self.fixture.update_advisor(old_id, advisor).await,
        }
    }

    pub async fn delete_advisor(&self, id: &str) -> Result<(), StoreError> {
        match self.sheets(true).await {
            Some(sheets) => sheets.delete_advisor(id).await,
            None => self.fixture.delete_advisor(id).await,
        }
    }

    /// Stamp the report with an id and timestamp, persist it, return the id.
    pub async fn save_report(&self, report: NewHomeroomReport) -> Result<String, StoreError> {
        let report = report.into_report(Uuid::now_v7().to_string(), Utc::now().to_rfc3339());

        match self.sheets(true).await {
            Some(sheets) => sheets.save_report(&report).await?,
            None => {
                warn!("Sheet not connected, saving report {} to fixture store", report.id);
                self.fixture.save_report(&report).await?;
            }
        }

        Ok(report.id)
    }

    pub async fn get_reports(&self) -> Vec<HomeroomReport> {
        if let Some(sheets) = self.sheets(false).await {
            match sheets.get_reports().await {
                Ok(reports) => return reports,
                Err(e) => error!("Error fetching reports, using fixture data: {}", e),
            }
        }
        self.fixture.get_reports().await.unwrap_or_default()
    }
}
