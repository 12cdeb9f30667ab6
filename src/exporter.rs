//! URL to PDF export.
//!
//! [`PdfExporter::export`] runs the whole conversion: launch a session, open
//! a page, navigate and wait for the configured load condition under the
//! navigation deadline, print to PDF, write the file, release the session.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::browser::{navigate_and_wait, BrowserSession};
use crate::config::PdfSettings;
use crate::{Config, PaperFormat, Result, WebPdfError};

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Where the PDF was written.
    pub output: PathBuf,
    /// Size of the written PDF.
    pub bytes: usize,
    pub format: PaperFormat,
    /// Wall time from launch to session release.
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    config: Config,
}

impl PdfExporter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Renders `url` and writes it as a PDF to `output`.
    ///
    /// The browser session is released whether or not the render succeeds;
    /// a render failure is reported in preference to a failure to close.
    pub async fn export(&self, url: &str, output: &Path) -> Result<ExportReport> {
        let start = Instant::now();
        let session =
            BrowserSession::launch(&self.config.browser, self.config.timeouts.launch).await?;

        let written = self.render_into(&session, url, output).await;

        if let Err(err) = session.close().await {
            warn!("failed to close browser cleanly: {err}");
        }
        let bytes = written?;

        let report = ExportReport {
            output: output.to_path_buf(),
            bytes,
            format: self.config.pdf.format,
            elapsed: start.elapsed(),
        };
        info!(
            url,
            output = %report.output.display(),
            bytes = report.bytes,
            format = %report.format,
            "exported PDF in {:.1}s",
            report.elapsed.as_secs_f32()
        );
        Ok(report)
    }

    async fn render_into(&self, session: &BrowserSession, url: &str, output: &Path) -> Result<usize> {
        let page = session.new_page().await?;
        self.navigate(&page, url).await?;

        debug!(format = %self.config.pdf.format, "printing page to PDF");
        let pdf = page
            .pdf(print_params(&self.config.pdf))
            .await
            .map_err(|err| WebPdfError::Render(err.to_string()))?;

        tokio::fs::write(output, &pdf)
            .await
            .map_err(|source| WebPdfError::Output {
                path: output.to_path_buf(),
                source,
            })?;
        Ok(pdf.len())
    }

    async fn navigate(&self, page: &Page, url: &str) -> Result<()> {
        let deadline = self.config.timeouts.navigation;
        let wait_until = self.config.wait_until;
        match timeout(deadline, navigate_and_wait(page, url, wait_until)).await {
            Ok(result) => result,
            Err(_) => Err(WebPdfError::timeout(
                format!("{} on {url}", wait_until.lifecycle_event()),
                deadline,
            )),
        }
    }
}

/// Print options for `Page.printToPDF`; unset fields keep Chrome's defaults.
pub fn print_params(settings: &PdfSettings) -> PrintToPdfParams {
    let (paper_width, paper_height) = settings.format.dimensions();
    PrintToPdfParams {
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        landscape: settings.landscape.then_some(true),
        print_background: settings.print_background.then_some(true),
        ..Default::default()
    }
}
