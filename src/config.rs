//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Development default values - NEVER rely on these in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_MAX_UPLOAD_SIZE: usize = 20_971_520; // 20MB per upload request
    pub const CHROME_PATH: &str = "chromium";
    pub const RENDER_TIMEOUT_SECS: u64 = 30;
    pub const FONT_TIMEOUT_SECS: u64 = 5;
    pub const PHOTO_TIMEOUT_SECS: u64 = 10;
    pub const FONT_REGULAR_URL: &str =
        "https://github.com/google/fonts/raw/main/ofl/sarabun/Sarabun-Regular.ttf";
    pub const FONT_BOLD_URL: &str =
        "https://github.com/google/fonts/raw/main/ofl/sarabun/Sarabun-Bold.ttf";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Google Sheets credentials. All three must be present to leave fixture mode.
#[derive(Debug, Clone)]
pub struct SheetSettings {
    /// Spreadsheet identifier (from the sheet URL)
    pub sheet_id: String,
    /// Service account e-mail
    pub service_account_email: String,
    /// Service account private key (PEM, newlines normalized)
    pub private_key: SecretString,
}

/// PDF rendering settings.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Chromium/Chrome executable used for headless printing
    pub chrome_path: PathBuf,
    /// Upper bound for one render (launch + load + print)
    pub render_timeout: Duration,
    /// Upper bound for fetching both embedded fonts
    pub font_timeout: Duration,
    pub font_regular_url: String,
    pub font_bold_url: String,
    /// Fetch report photos and embed them as `data:` URIs before printing
    pub inline_photos: bool,
    /// Upper bound for fetching one photo
    pub photo_timeout: Duration,
    /// Optional logo image embedded on the cover page
    pub logo_path: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Sheet credentials; `None` means fixture mode
    pub sheets: Option<SheetSettings>,
    /// External upload endpoint (Apps Script web app)
    pub upload_url: Option<String>,
    /// Maximum accepted multipart payload in bytes
    pub max_upload_size: usize,
    /// PDF rendering settings
    pub render: RenderSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `HR_HOST`: Server host (default: 127.0.0.1)
    /// - `HR_PORT`: Server port (default: 8080)
    /// - `GOOGLE_SHEET_ID`, `GOOGLE_SERVICE_ACCOUNT_EMAIL`, `GOOGLE_PRIVATE_KEY`:
    ///   sheet credentials (fixture mode when any is missing)
    /// - `GOOGLE_APPS_SCRIPT_URL`: photo upload endpoint
    /// - `HR_MAX_UPLOAD_SIZE`: Max upload payload in bytes (default: 20MB)
    /// - `HR_CHROME_PATH`: Chromium executable (default: chromium)
    /// - `HR_RENDER_TIMEOUT_SECS`: render timeout (default: 30)
    /// - `HR_FONT_TIMEOUT_SECS`: font fetch timeout (default: 5)
    /// - `HR_FONT_REGULAR_URL`, `HR_FONT_BOLD_URL`: embedded font sources
    /// - `HR_INLINE_PHOTOS`: embed photos before printing (default: true)
    /// - `HR_PHOTO_TIMEOUT_SECS`: per-photo fetch timeout (default: 10)
    /// - `HR_LOGO_PATH`: optional cover logo
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("HR_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("HR_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("HR_PORT must be a valid port number"))?;

        let sheets = sheet_settings(
            non_empty_var("GOOGLE_SHEET_ID"),
            non_empty_var("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
            non_empty_var("GOOGLE_PRIVATE_KEY"),
        );

        let upload_url = non_empty_var("GOOGLE_APPS_SCRIPT_URL");

        let max_upload_size = env::var("HR_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("HR_MAX_UPLOAD_SIZE must be a valid number"))?;

        let render_timeout_secs = env::var("HR_RENDER_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::RENDER_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("HR_RENDER_TIMEOUT_SECS must be a valid number")
            })?;

        let font_timeout_secs = env::var("HR_FONT_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::FONT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("HR_FONT_TIMEOUT_SECS must be a valid number"))?;

        let photo_timeout_secs = env::var("HR_PHOTO_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::PHOTO_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("HR_PHOTO_TIMEOUT_SECS must be a valid number")
            })?;

        let inline_photos = match non_empty_var("HR_INLINE_PHOTOS") {
            None => true,
            Some(raw) => parse_flag(&raw)
                .ok_or(ConfigError::InvalidValue("HR_INLINE_PHOTOS must be true or false"))?,
        };

        let render = RenderSettings {
            chrome_path: env::var("HR_CHROME_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(defaults::CHROME_PATH)),
            render_timeout: Duration::from_secs(render_timeout_secs),
            font_timeout: Duration::from_secs(font_timeout_secs),
            font_regular_url: env::var("HR_FONT_REGULAR_URL")
                .unwrap_or_else(|_| defaults::FONT_REGULAR_URL.to_string()),
            font_bold_url: env::var("HR_FONT_BOLD_URL")
                .unwrap_or_else(|_| defaults::FONT_BOLD_URL.to_string()),
            inline_photos,
            photo_timeout: Duration::from_secs(photo_timeout_secs),
            logo_path: non_empty_var("HR_LOGO_PATH").map(PathBuf::from),
        };

        let config = Config {
            environment,
            host,
            port,
            sheets,
            upload_url,
            max_upload_size,
            render,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Production must talk to the real sheet and upload endpoint.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.sheets.is_none() {
            errors.push(
                "GOOGLE_SHEET_ID/GOOGLE_SERVICE_ACCOUNT_EMAIL/GOOGLE_PRIVATE_KEY must all be set. \
                 Production does not run on fixture data."
                    .to_string(),
            );
        }

        if self.upload_url.is_none() {
            errors.push("GOOGLE_APPS_SCRIPT_URL must be set for photo uploads.".to_string());
        }

        if self.render.render_timeout.is_zero() {
            errors.push("HR_RENDER_TIMEOUT_SECS must be greater than zero.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn sheet_settings(
    sheet_id: Option<String>,
    email: Option<String>,
    raw_key: Option<String>,
) -> Option<SheetSettings> {
    Some(SheetSettings {
        sheet_id: sheet_id?,
        service_account_email: email?,
        private_key: SecretString::from(normalize_private_key(&raw_key?)),
    })
}

/// Keys pasted into env files usually carry literal `\n` sequences.
pub fn normalize_private_key(raw: &str) -> String {
    if raw.contains("\\n") {
        raw.replace("\\n", "\n")
    } else {
        raw.to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
