//! Shared test helpers for the API suite.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{App, dev::ServiceResponse, test};
use async_trait::async_trait;
use homeroom_lib::config::RenderSettings;
use homeroom_lib::models::{Advisor, HomeroomReport};
use homeroom_lib::services::{AssetLoader, PdfEngine, RenderError, UploadClient};
use homeroom_lib::state::AppState;
use homeroom_lib::store::{FixtureStore, RecordStore};
use serde_json::Value;

/// Payload limit used by test apps.
pub const TEST_MAX_UPLOAD_SIZE: usize = 1024 * 1024;

/// Bytes returned by [`CapturingEngine`].
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% homeroom test document\n%%EOF";

/// PDF engine that records the HTML it is asked to print.
#[derive(Default)]
pub struct CapturingEngine {
    pages: Mutex<Vec<String>>,
}

impl CapturingEngine {
    /// HTML of the most recent render.
    pub fn last_html(&self) -> String {
        self.pages.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn render_count(&self) -> usize {
        self.pages.lock().unwrap().len()
    }
}

#[async_trait]
impl PdfEngine for CapturingEngine {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        self.pages.lock().unwrap().push(html.to_string());
        Ok(FAKE_PDF.to_vec())
    }
}

/// Render settings whose fonts are unreachable, so documents fall back to
/// system fonts without waiting on the network. Photos print by URL.
pub fn offline_render_settings() -> RenderSettings {
    RenderSettings {
        chrome_path: PathBuf::from("chromium"),
        render_timeout: Duration::from_secs(5),
        font_timeout: Duration::from_millis(200),
        font_regular_url: "http://127.0.0.1:9/Sarabun-Regular.ttf".to_string(),
        font_bold_url: "http://127.0.0.1:9/Sarabun-Bold.ttf".to_string(),
        inline_photos: false,
        photo_timeout: Duration::from_millis(200),
        logo_path: None,
    }
}

/// Application wiring plus handles the tests inspect.
pub struct TestContext {
    pub state: AppState,
    pub engine: Arc<CapturingEngine>,
}

impl TestContext {
    /// Fixture-backed app with the given upload endpoint.
    pub fn with_fixture(fixture: FixtureStore, upload_url: Option<String>) -> Self {
        Self::with_store(RecordStore::with_fixture(fixture), upload_url)
    }

    pub fn with_store(store: RecordStore, upload_url: Option<String>) -> Self {
        Self::with_settings(store, upload_url, &offline_render_settings())
    }

    pub fn with_settings(
        store: RecordStore,
        upload_url: Option<String>,
        render: &RenderSettings,
    ) -> Self {
        let engine = Arc::new(CapturingEngine::default());
        let state = AppState::new(
            Arc::new(store),
            engine.clone(),
            AssetLoader::new(render),
            UploadClient::new(upload_url),
            TEST_MAX_UPLOAD_SIZE,
        );
        Self { state, engine }
    }
}

/// Create a test app serving `/api/v1`.
pub async fn create_test_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let state = ctx.state.clone();
    test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await
}

/// Advisor record for fixtures.
pub fn advisor(id: &str, name: &str, class_level: &str, room: &str, department: &str) -> Advisor {
    Advisor {
        id: id.to_string(),
        name: name.to_string(),
        year: 2568,
        department: department.to_string(),
        class_level: class_level.to_string(),
        room: room.to_string(),
    }
}

/// Stored report for fixtures.
pub fn report(id: &str, advisor_name: &str, term: &str, week: u32, date: &str) -> HomeroomReport {
    HomeroomReport {
        id: id.to_string(),
        term: term.to_string(),
        academic_year: "2568".to_string(),
        week,
        date: date.to_string(),
        advisor_name: advisor_name.to_string(),
        department: "เทคโนโลยีสารสนเทศ".to_string(),
        class_level: "ปวช. 1".to_string(),
        room: "1/1".to_string(),
        topic: format!("สัปดาห์ที่ {}", week),
        total_students: 30,
        present_students: 28,
        absent_students: 2,
        photo_url: None,
        timestamp: format!("{}T08:00:00+07:00", date),
    }
}

/// Percent-encode each segment of an advisor id, keeping `/` literal.
pub fn encode_id(id: &str) -> String {
    id.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encode a query value.
pub fn q(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Assert an error body carries the expected code.
pub fn assert_error_code(body: &Value, code: &str) {
    assert_eq!(body["error"], code, "unexpected error body: {}", body);
    assert!(body["message"].is_string());
}
