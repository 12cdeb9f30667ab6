use std::path::Path;

use webpdf_lib::{Config, WebPdfError};

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/webpdf/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, WebPdfError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        WebPdfError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        WebPdfError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let executable = config
        .browser
        .executable
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "auto".to_string());
    format!(
        "Effective config [{source}]: format={}, landscape={}, background={}, wait_until={}, timeouts: nav={}s, launch={}s, browser: headless={}, sandbox={}, executable={}, args={}",
        config.pdf.format,
        config.pdf.landscape,
        config.pdf.print_background,
        config.wait_until,
        config.timeouts.navigation.as_secs(),
        config.timeouts.launch.as_secs(),
        config.browser.headless,
        config.browser.sandbox,
        executable,
        config.browser.args.len(),
    )
}
