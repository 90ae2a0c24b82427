//! Business logic services.

pub mod aggregation;
pub mod assets;
pub mod document;
pub mod pdf;
pub mod renderer;
pub mod upload;
pub mod url_normalizer;

pub use aggregation::{ReportFilter, ReportService};
pub use assets::AssetLoader;
pub use pdf::{GeneratedPdf, PdfService};
pub use renderer::{ChromeEngine, PdfEngine, PdfRenderer, RenderError};
pub use upload::{UploadClient, UploadFile};
