use std::process::ExitCode;

use webpdf_lib::{ErrorPayload, WebPdfError};

/// Render an error to stderr and return the failure exit code.
pub fn render_error(err: WebPdfError) -> ExitCode {
    eprintln!("{}", format_error(&err.to_payload()));
    // Usage errors exit with 2 from clap; every runtime failure uses 1.
    ExitCode::FAILURE
}

/// Format a payload as `error[category]: message` plus an optional hint line.
pub fn format_error(payload: &ErrorPayload) -> String {
    let mut out = format!("error[{}]: {}", payload.category.as_str(), payload.message);
    if let Some(hint) = &payload.remediation {
        out.push_str("\nhint: ");
        out.push_str(hint);
    }
    out
}
