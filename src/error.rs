use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::error::CdpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebPdfError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("Failed to write PDF to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser protocol error: {0}")]
    Browser(#[from] CdpError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WebPdfError {
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        WebPdfError::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        WebPdfError::Timeout {
            what: what.into(),
            after,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            WebPdfError::Launch(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("executable") || lower.contains("auto detect") {
                    ErrorPayload::new(
                        ErrorCategory::Launch,
                        self.to_string(),
                        "Install Chrome or Chromium, or set `executable` under [browser] in the config file.",
                    )
                } else if lower.contains("sandbox") {
                    ErrorPayload::new(
                        ErrorCategory::Launch,
                        self.to_string(),
                        "Set `sandbox = false` under [browser] when running as root or inside a container.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Launch,
                        self.to_string(),
                        "Check that the browser starts on this machine; re-run with --verbose for its output.",
                    )
                }
            }
            WebPdfError::Navigation { message, .. } => {
                let lower = message.to_ascii_lowercase();
                if lower.contains("name_not_resolved") {
                    ErrorPayload::new(
                        ErrorCategory::Navigation,
                        self.to_string(),
                        "Check the host name in the URL and your DNS settings.",
                    )
                } else if lower.contains("connection_refused") {
                    ErrorPayload::new(
                        ErrorCategory::Navigation,
                        self.to_string(),
                        "Nothing is listening at that address; check the port and that the server is running.",
                    )
                } else if lower.contains("invalid_url") {
                    ErrorPayload::new(
                        ErrorCategory::Navigation,
                        self.to_string(),
                        "Pass a complete URL including the scheme (e.g., https://example.com).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Navigation,
                        self.to_string(),
                        "Check the URL and network connectivity (proxy/VPN) and retry.",
                    )
                }
            }
            WebPdfError::Timeout { .. } => ErrorPayload::new(
                ErrorCategory::Timeout,
                self.to_string(),
                "Raise [timeouts] navigation/launch in the config, or use a weaker `wait_until` such as \"load\".",
            ),
            WebPdfError::Render(_) => ErrorPayload::new(
                ErrorCategory::Render,
                self.to_string(),
                "The page could not be printed; re-run with --verbose for browser details.",
            ),
            WebPdfError::Output { .. } => ErrorPayload::new(
                ErrorCategory::Output,
                self.to_string(),
                "Check that the output directory exists and is writable.",
            ),
            WebPdfError::Browser(_) => ErrorPayload::new(
                ErrorCategory::Browser,
                self.to_string(),
                "The connection to the browser failed; re-run with --verbose for details.",
            ),
            WebPdfError::Config(_) => ErrorPayload::new(
                ErrorCategory::Config,
                self.to_string(),
                "Check the config file (TOML): wait_until, [timeouts], [pdf] and [browser] keys.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, WebPdfError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Launch,
    Navigation,
    Timeout,
    Render,
    Output,
    Browser,
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Launch => "launch",
            ErrorCategory::Navigation => "navigation",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Render => "render",
            ErrorCategory::Output => "output",
            ErrorCategory::Browser => "browser",
            ErrorCategory::Config => "config",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
