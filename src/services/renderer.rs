//! HTML to PDF rendering via headless Chromium.
//!
//! Every render runs its own browser process inside a private temporary
//! directory that holds the input HTML, the browser profile and the output
//! file. The browser leads its own process group; the whole group is killed
//! when the render ends for any reason, and the directory is removed with it.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::RenderSettings;

/// Every PDF file starts with this marker.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Virtual time Chromium may spend loading remote images before printing.
const VIRTUAL_TIME_BUDGET_MS: u64 = 10_000;

/// Rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("render exceeded {0}s")]
    Timeout(u64),

    #[error("browser exited with {0}")]
    Exit(String),

    #[error("invalid PDF output: {0}")]
    Output(String),
}

/// Converts one HTML document into PDF bytes.
#[async_trait]
pub trait PdfEngine: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Headless Chrome/Chromium driven through its `--print-to-pdf` mode.
pub struct ChromeEngine {
    chrome_path: PathBuf,
    timeout: Duration,
}

impl ChromeEngine {
    pub fn new(chrome_path: PathBuf, timeout: Duration) -> Self {
        Self {
            chrome_path,
            timeout,
        }
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.chrome_path.clone(), settings.render_timeout)
    }
}

#[async_trait]
impl PdfEngine for ChromeEngine {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let workdir = tempfile::Builder::new()
            .prefix("homeroom-pdf-")
            .tempdir()
            .map_err(|e| RenderError::Launch(format!("cannot create work directory: {}", e)))?;
        let input = workdir.path().join("document.html");
        let output = workdir.path().join("document.pdf");
        let profile = workdir.path().join("profile");

        tokio::fs::write(&input, html)
            .await
            .map_err(|e| RenderError::Launch(format!("cannot write document: {}", e)))?;

        let mut command = Command::new(&self.chrome_path);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-first-run")
            .arg("--hide-scrollbars")
            .arg("--no-pdf-header-footer")
            .arg("--print-to-pdf-no-header")
            .arg(format!("--virtual-time-budget={}", VIRTUAL_TIME_BUDGET_MS))
            .arg(format!("--user-data-dir={}", profile.display()))
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(|e| {
            RenderError::Launch(format!("{}: {}", self.chrome_path.display(), e))
        })?;
        let _group = ProcessGroupGuard::new(child.id());

        debug!("Started {} for {} bytes of HTML", self.chrome_path.display(), html.len());

        // Dropping the wait future on timeout drops the child, which kills it;
        // the group guard takes whatever it started
        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| RenderError::Exit(e.to_string()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let last_line = stderr.lines().last().unwrap_or("").trim().to_string();
            return Err(RenderError::Exit(format!("{} {}", result.status, last_line)));
        }

        tokio::fs::read(&output)
            .await
            .map_err(|e| RenderError::Output(format!("no output file: {}", e)))
    }
}

/// Kills the browser's process group on drop, reaching helpers that a
/// wrapper script started without `exec`.
struct ProcessGroupGuard {
    pgid: Option<u32>,
}

impl ProcessGroupGuard {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            // Fails harmlessly when the group already exited
            let killed = std::process::Command::new("kill")
                .arg("-KILL")
                .arg("--")
                .arg(format!("-{}", pgid))
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            if let Err(e) = killed {
                warn!("Could not signal browser process group {}: {}", pgid, e);
            }
        }
    }
}

/// Validating front end over a [`PdfEngine`].
#[derive(Clone)]
pub struct PdfRenderer {
    engine: Arc<dyn PdfEngine>,
}

impl PdfRenderer {
    pub fn new(engine: Arc<dyn PdfEngine>) -> Self {
        Self { engine }
    }

    /// Render and check that the result really is a PDF.
    pub async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let started = std::time::Instant::now();
        let bytes = self.engine.render(html).await?;

        if !bytes.starts_with(PDF_MAGIC) {
            return Err(RenderError::Output(format!(
                "{} bytes without PDF header",
                bytes.len()
            )));
        }

        info!(
            bytes = bytes.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "PDF rendered"
        );
        Ok(bytes)
    }
}
