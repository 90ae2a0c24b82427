//! Mock of the Apps Script upload endpoint for tests.
//!
//! Accepts the same form body as the real web app and answers with a Drive
//! URL per file. File names listed in `reject` are answered with
//! `{ success: false }` so partial failures can be exercised.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpResponse, HttpServer, post, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

/// One upload as the endpoint saw it.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Default)]
pub struct MockUploadState {
    pub received: Vec<ReceivedFile>,
    pub reject: Vec<String>,
}

pub struct MockAppsScript {
    pub url: String,
    pub state: Arc<Mutex<MockUploadState>>,
}

#[post("/exec")]
async fn exec(
    state: web::Data<Arc<Mutex<MockUploadState>>>,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    let file_name = form.get("fileName").cloned().unwrap_or_default();
    let data = match form.get("file").map(|f| STANDARD.decode(f)) {
        Some(Ok(data)) => data,
        _ => {
            return HttpResponse::Ok().json(json!({ "success": false, "error": "bad file" }));
        }
    };

    let mut state = state.lock().unwrap();
    state.received.push(ReceivedFile {
        file_name: file_name.clone(),
        mime_type: form.get("mimeType").cloned().unwrap_or_default(),
        data,
    });

    if state.reject.contains(&file_name) {
        return HttpResponse::Ok().json(json!({ "success": false, "error": "Drive quota exceeded" }));
    }

    HttpResponse::Ok().json(json!({
        "success": true,
        "url": format!("https://drive.google.com/uc?export=view&id={}", file_name),
    }))
}

impl MockAppsScript {
    /// Start the mock on an ephemeral port.
    pub async fn start(reject: &[&str]) -> Self {
        let state = Arc::new(Mutex::new(MockUploadState {
            received: Vec::new(),
            reject: reject.iter().map(|r| r.to_string()).collect(),
        }));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .app_data(web::FormConfig::default().limit(4 * 1024 * 1024))
                .service(exec)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Lives until the test runtime shuts down
        tokio::spawn(server);

        MockAppsScript {
            url: format!("http://127.0.0.1:{}/exec", port),
            state,
        }
    }

    pub fn received(&self) -> Vec<ReceivedFile> {
        self.state.lock().unwrap().received.clone()
    }
}
