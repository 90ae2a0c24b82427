//! Google Sheets backend (Sheets API v4 over REST).

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::rows::{
    self, ADVISOR_HEADERS, REPORT_HEADERS, SheetTable, advisors_from_table, find_advisor_row,
    reports_from_table,
};
use super::service_account::ServiceAccountAuth;
use super::{RecordBackend, StoreError};
use crate::config::SheetSettings;
use crate::models::{Advisor, HomeroomReport};

/// Tab holding advisor assignments.
pub const ADVISORS_SHEET: &str = "Advisors";

/// Tab holding every report ever saved.
pub const REPORTS_SHEET: &str = "Reports";

/// Google API base URLs.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    /// Spreadsheets collection, without trailing slash
    pub sheets_api_base: String,
    /// OAuth token endpoint (also the assertion audience)
    pub token_url: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            sheets_api_base: "https://sheets.googleapis.com/v4/spreadsheets".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// A1 reference to a whole tab, or to a cell within it.
fn a1_range(title: &str, cell: Option<&str>) -> String {
    let quoted = format!("'{}'", title.replace('\'', "''"));
    match cell {
        Some(cell) => format!("{}!{}", quoted, cell),
        None => quoted,
    }
}

/// Session against one spreadsheet.
pub struct SheetsStore {
    auth: ServiceAccountAuth,
    http: reqwest::Client,
    /// `{sheets_api_base}/{sheet_id}`
    base_url: String,
    /// Tab title to numeric sheet id
    tabs: RwLock<HashMap<String, i64>>,
}

impl SheetsStore {
    /// Authenticate and load the tab list. Any failure means the sheet is
    /// unusable and the caller should stay in fixture mode.
    pub async fn connect(
        settings: &SheetSettings,
        endpoints: &GoogleEndpoints,
        http: reqwest::Client,
    ) -> Result<Self, StoreError> {
        let auth = ServiceAccountAuth::new(
            &settings.service_account_email,
            &settings.private_key,
            &endpoints.token_url,
            http.clone(),
        )?;

        let store = Self {
            auth,
            http,
            base_url: format!(
                "{}/{}",
                endpoints.sheets_api_base.trim_end_matches('/'),
                settings.sheet_id
            ),
            tabs: RwLock::new(HashMap::new()),
        };

        store.refresh_tabs().await?;
        Ok(store)
    }

    /// Reload the tab title to id map.
    pub async fn refresh_tabs(&self) -> Result<(), StoreError> {
        let url = format!("{}?fields=sheets.properties(sheetId,title)", self.base_url);
        let meta: SpreadsheetMeta = serde_json::from_value(self.send(Method::GET, &url, None).await?)
            .map_err(|e| StoreError::Api {
                status: 200,
                message: format!("unexpected spreadsheet metadata: {}", e),
            })?;

        let tabs: HashMap<String, i64> = meta
            .sheets
            .into_iter()
            .map(|s| (s.properties.title, s.properties.sheet_id))
            .collect();
        debug!("Spreadsheet has {} tabs", tabs.len());
        *self.tabs.write().await = tabs;
        Ok(())
    }

    async fn sheet_id(&self, title: &str) -> Option<i64> {
        self.tabs.read().await.get(title).copied()
    }

    async fn send(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, StoreError> {
        let token = self.auth.access_token().await?;
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Api {
            status: status.as_u16(),
            message: format!("invalid JSON response: {}", e),
        })
    }

    /// All rows of a tab, header first.
    pub async fn read_rows(&self, title: &str) -> Result<SheetTable, StoreError> {
        if self.sheet_id(title).await.is_none() {
            return Err(StoreError::MissingSheet(title.to_string()));
        }

        let url = format!(
            "{}/values/{}",
            self.base_url,
            urlencoding::encode(&a1_range(title, None))
        );
        let range: ValueRange = serde_json::from_value(self.send(Method::GET, &url, None).await?)
            .unwrap_or(ValueRange { values: Vec::new() });

        let values = range
            .values
            .iter()
            .map(|row| row.iter().map(rows::cell_text).collect())
            .collect();
        Ok(SheetTable::from_values(values))
    }

    /// Append one row after the last non-empty row of a tab.
    pub async fn append_row(&self, title: &str, row: Vec<Value>) -> Result<(), StoreError> {
        let url = format!(
            "{}/values/{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.base_url,
            urlencoding::encode(&a1_range(title, Some("A1")))
        );
        self.send(Method::POST, &url, Some(json!({ "values": [row] })))
            .await?;
        Ok(())
    }

    /// Overwrite sheet row `row_number` (1-based) starting at column A.
    pub async fn update_row(
        &self,
        title: &str,
        row_number: usize,
        row: Vec<Value>,
    ) -> Result<(), StoreError> {
        let cell = format!("A{}", row_number);
        let url = format!(
            "{}/values/{}?valueInputOption=RAW",
            self.base_url,
            urlencoding::encode(&a1_range(title, Some(&cell)))
        );
        self.send(Method::PUT, &url, Some(json!({ "values": [row] })))
            .await?;
        Ok(())
    }

    /// Remove sheet row `row_number` (1-based), shifting the rest up.
    pub async fn delete_row(&self, title: &str, row_number: usize) -> Result<(), StoreError> {
        let sheet_id = self
            .sheet_id(title)
            .await
            .ok_or_else(|| StoreError::MissingSheet(title.to_string()))?;
        let start = row_number.saturating_sub(1);

        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": start,
                        "endIndex": start + 1,
                    }
                }
            }]
        });
        self.send(Method::POST, &format!("{}:batchUpdate", self.base_url), Some(body))
            .await?;
        Ok(())
    }

    /// Create a tab with the given header row unless it already exists.
    pub async fn ensure_sheet(&self, title: &str, headers: &[&str]) -> Result<(), StoreError> {
        if self.sheet_id(title).await.is_some() {
            return Ok(());
        }

        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });
        let created = self
            .send(Method::POST, &format!("{}:batchUpdate", self.base_url), Some(body))
            .await;

        match created {
            Ok(value) => {
                let sheet_id = serde_json::from_value::<BatchUpdateResponse>(value)
                    .ok()
                    .and_then(|r| r.replies.into_iter().next())
                    .and_then(|reply| reply["addSheet"]["properties"]["sheetId"].as_i64());
                match sheet_id {
                    Some(id) => {
                        self.tabs.write().await.insert(title.to_string(), id);
                    }
                    None => self.refresh_tabs().await?,
                }
                info!("Created sheet '{}'", title);
                let header_row = headers.iter().map(|h| Value::from(*h)).collect();
                self.update_row(title, 1, header_row).await
            }
            Err(e) => {
                // Lost a race with a concurrent save creating the same tab
                self.refresh_tabs().await?;
                if self.sheet_id(title).await.is_some() {
                    warn!("Sheet '{}' appeared while creating it: {}", title, e);
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }
}

#[async_trait]
impl RecordBackend for SheetsStore {
    async fn get_advisors(&self, year: Option<i32>) -> Result<Vec<Advisor>, StoreError> {
        let table = self.read_rows(ADVISORS_SHEET).await?;
        Ok(advisors_from_table(&table, year))
    }

    async fn add_advisor(&self, advisor: Advisor) -> Result<(), StoreError> {
        self.ensure_sheet(ADVISORS_SHEET, &ADVISOR_HEADERS).await?;
        let mut table = self.read_rows(ADVISORS_SHEET).await?;
        if table.headers.is_empty() {
            table.headers = ADVISOR_HEADERS.iter().map(|h| h.to_string()).collect();
        }
        self.append_row(ADVISORS_SHEET, rows::advisor_to_row(&table.headers, &advisor, None))
            .await
    }

    async fn update_advisor(&self, old_id: &str, advisor: Advisor) -> Result<(), StoreError> {
        let table = self.read_rows(ADVISORS_SHEET).await?;
        let index = find_advisor_row(&table, old_id)
            .ok_or_else(|| StoreError::RowNotFound(format!("Advisor '{}'", old_id)))?;
        self.update_row(
            ADVISORS_SHEET,
            SheetTable::sheet_row_number(index),
            rows::advisor_to_row(&table.headers, &advisor, Some(&table.rows[index])),
        )
        .await
    }

    async fn delete_advisor(&self, id: &str) -> Result<(), StoreError> {
        let table = self.read_rows(ADVISORS_SHEET).await?;
        let index = find_advisor_row(&table, id)
            .ok_or_else(|| StoreError::RowNotFound(format!("Advisor '{}'", id)))?;
        self.delete_row(ADVISORS_SHEET, SheetTable::sheet_row_number(index))
            .await
    }

    async fn save_report(&self, report: &HomeroomReport) -> Result<(), StoreError> {
        let row = rows::report_to_row(report);

        self.ensure_sheet(REPORTS_SHEET, &REPORT_HEADERS).await?;
        self.append_row(REPORTS_SHEET, row.clone()).await?;

        let term_title = rows::term_sheet_title(report);
        self.ensure_sheet(&term_title, &REPORT_HEADERS).await?;
        self.append_row(&term_title, row).await?;

        debug!("Saved report {} to '{}' and '{}'", report.id, REPORTS_SHEET, term_title);
        Ok(())
    }

    async fn get_reports(&self) -> Result<Vec<HomeroomReport>, StoreError> {
        let table = self.read_rows(REPORTS_SHEET).await?;
        Ok(reports_from_table(&table))
    }
}
