//! webpdf Library
//!
//! Renders a web page in headless Chrome and saves it as a PDF. The browser
//! is driven over the DevTools protocol with `chromiumoxide`.
//!
//! # Module Overview
//!
//! - [`browser`] - Scoped browser session and load-completion waiting
//! - [`exporter`] - The end-to-end URL to PDF export
//! - [`config`] - Configuration file support
//! - [`paper`] - Named paper sizes
//! - [`error`] - Error type and user-facing payloads
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use webpdf_lib::{Config, PdfExporter};
//!
//! # async fn example() -> webpdf_lib::Result<()> {
//! let exporter = PdfExporter::new(Config::default());
//! let report = exporter.export("https://example.com", Path::new("example.pdf")).await?;
//! println!("wrote {} bytes", report.bytes);
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod exporter;
pub mod paper;

pub use browser::{BrowserSession, LifecycleWatcher, WaitUntil};
pub use config::{
    BrowserSettings, Config, ConfigError, PdfSettings, Timeouts, DEFAULT_LAUNCH_TIMEOUT,
    DEFAULT_NAVIGATION_TIMEOUT,
};
pub use error::{ErrorCategory, ErrorPayload, Result, WebPdfError};
pub use exporter::{print_params, ExportReport, PdfExporter};
pub use paper::PaperFormat;
