use std::path::PathBuf;
use std::process::ExitCode;

use tracing::debug;
use webpdf_lib::PdfExporter;

use crate::formatting::render_error;
use crate::settings::{format_effective_config, load_config};

/// Run the export: load config, convert `url`, write `output`.
pub async fn run_export(config_path: Option<PathBuf>, url: String, output: PathBuf) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err),
    };
    debug!("{}", format_effective_config(&config, config_path.as_deref()));

    let exporter = PdfExporter::new(config);
    match exporter.export(&url, &output).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => render_error(err),
    }
}
