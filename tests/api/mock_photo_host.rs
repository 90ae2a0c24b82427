//! Mock image host for photo embedding tests.
//!
//! `GET /photos/{name}` serves fixed bytes by extension. `missing.*` answers
//! 404, `page.*` answers with HTML and `slow.*` waits three seconds first.

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, get, web};

pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFFjpeg-photo";
pub const PNG_BYTES: &[u8] = b"\x89PNGpng-photo";

pub struct MockPhotoHost {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

#[get("/photos/{name}")]
async fn photo(
    requests: web::Data<Arc<Mutex<Vec<String>>>>,
    name: web::Path<String>,
) -> HttpResponse {
    let name = name.into_inner();
    requests.lock().unwrap().push(name.clone());

    let stem = name.split('.').next().unwrap_or_default();
    match stem {
        "missing" => return HttpResponse::NotFound().finish(),
        "page" => {
            return HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body("<html>sign in</html>");
        }
        "slow" => actix_web::rt::time::sleep(Duration::from_secs(3)).await,
        _ => {}
    }

    if name.ends_with(".png") {
        HttpResponse::Ok().content_type("image/png").body(PNG_BYTES)
    } else {
        HttpResponse::Ok().content_type("image/jpeg").body(JPEG_BYTES)
    }
}

impl MockPhotoHost {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();

        let requests_data = requests.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(requests_data.clone()))
                .service(photo)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        tokio::spawn(server);

        MockPhotoHost {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
        }
    }

    pub fn url(&self, name: &str) -> String {
        format!("{}/photos/{}", self.base_url, name)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
