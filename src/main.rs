//! Homeroom Report Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use homeroom_lib::api::ApiDoc;
use homeroom_lib::config::Config;
use homeroom_lib::middleware::{REQUEST_ID_HEADER, RequestLogger};
use homeroom_lib::state::AppState;
use homeroom_lib::store::StoreMode;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, GOOGLE_SHEET_ID, GOOGLE_SERVICE_ACCOUNT_EMAIL,");
            error!("    GOOGLE_PRIVATE_KEY and GOOGLE_APPS_SCRIPT_URL must be set");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Homeroom Report Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }
    if config.upload_url.is_none() {
        warn!("GOOGLE_APPS_SCRIPT_URL not set - photo uploads will be skipped");
    }
    info!(
        "PDF rendering via {} (timeout {}s)",
        config.render.chrome_path.display(),
        config.render.render_timeout.as_secs()
    );

    let state = AppState::from_config(&config);

    state.store.connect().await;
    match state.store.mode().await {
        StoreMode::Sheets => info!("Record store: Google Sheets"),
        StoreMode::Fixture => warn!("Record store: fixture data (sheet not configured or unreachable)"),
    }

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };

    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .expose_headers(vec![
                    header::CONTENT_DISPOSITION,
                    header::HeaderName::from_static(REQUEST_ID_HEADER),
                ])
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .wrap(RequestLogger)
            .configure(|cfg| state.configure(cfg))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
