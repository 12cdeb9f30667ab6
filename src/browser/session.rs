//! Scoped headless-browser session.
//!
//! A [`BrowserSession`] owns the browser process, the task that drives its
//! CDP connection and a private profile directory. [`BrowserSession::close`]
//! shuts all three down; if the session is dropped without being closed the
//! handler task is aborted and the process is killed by `chromiumoxide`'s
//! kill-on-drop child handle.

use std::future::Future;
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::BrowserSettings;
use crate::{Result, WebPdfError};

/// How long a closing browser gets to exit before it is killed.
const EXIT_GRACE: Duration = Duration::from_secs(5);

pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    closed: bool,
    // Dropped last so the profile outlives the process that uses it.
    _profile_dir: TempDir,
}

impl BrowserSession {
    /// Launches a browser according to `settings`, bounded by `launch_timeout`.
    pub async fn launch(settings: &BrowserSettings, launch_timeout: Duration) -> Result<Self> {
        let profile_dir = tempfile::Builder::new()
            .prefix("webpdf-profile-")
            .tempdir()
            .map_err(|err| {
                WebPdfError::Launch(format!("cannot create browser profile directory: {err}"))
            })?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir.path())
            .viewport(None)
            .args(settings.args.iter().cloned());
        if !settings.headless {
            builder = builder.with_head();
        }
        if !settings.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = &settings.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(map_launch_error)?;

        debug!(
            executable = ?settings.executable,
            headless = settings.headless,
            sandbox = settings.sandbox,
            "launching browser"
        );
        let (browser, mut handler) = match timeout(launch_timeout, Browser::launch(config)).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(err)) => return Err(map_launch_error(err)),
            Err(_) => return Err(WebPdfError::timeout("the browser to start", launch_timeout)),
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!("browser handler: {err}");
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            closed: false,
            _profile_dir: profile_dir,
        })
    }

    /// Opens a blank page.
    pub async fn new_page(&self) -> Result<Page> {
        Ok(self.browser.new_page("about:blank").await?)
    }

    /// Closes the browser and waits for its process to exit.
    ///
    /// A browser that rejects `Browser.close` or is still running after
    /// [`EXIT_GRACE`] is killed, so this never blocks on a hung process.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        if let Err(err) = &closed {
            warn!("browser did not accept close ({err}); killing it");
            self.kill().await;
        }

        let exit = wait_for_exit(self.browser.wait(), EXIT_GRACE).await;
        match exit {
            ProcessExit::Exited(status) => debug!(?status, "browser exited"),
            ProcessExit::WaitFailed(err) => warn!("could not wait for browser exit: {err}"),
            ProcessExit::StillRunning => {
                warn!("browser still running after {EXIT_GRACE:?}; killing it");
                self.kill().await;
            }
        }

        self.handler.abort();
        self.closed = true;
        closed?;
        Ok(())
    }

    async fn kill(&mut self) {
        if let Some(Err(err)) = self.browser.kill().await {
            warn!("failed to kill browser: {err}");
        }
    }
}

#[derive(Debug)]
enum ProcessExit {
    Exited(Option<ExitStatus>),
    WaitFailed(io::Error),
    StillRunning,
}

async fn wait_for_exit<F>(wait: F, grace: Duration) -> ProcessExit
where
    F: Future<Output = io::Result<Option<ExitStatus>>>,
{
    match timeout(grace, wait).await {
        Ok(Ok(status)) => ProcessExit::Exited(status),
        Ok(Err(err)) => ProcessExit::WaitFailed(err),
        Err(_) => ProcessExit::StillRunning,
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("browser session dropped without close; killing browser");
        }
        self.handler.abort();
    }
}

/// Maps a launch-time failure to a [`WebPdfError::Launch`] with a hint.
pub(crate) fn map_launch_error(err: impl std::fmt::Display) -> WebPdfError {
    let message = err.to_string();
    let lower = message.to_ascii_lowercase();

    if lower.contains("could not auto detect") {
        WebPdfError::Launch(
            "no Chrome/Chromium executable found; install one or set browser.executable"
                .to_string(),
        )
    } else if lower.contains("no such file") || lower.contains("not found") {
        WebPdfError::Launch(format!("browser executable could not be started: {message}"))
    } else if lower.contains("sandbox") {
        WebPdfError::Launch(message.trim().to_string())
    } else {
        WebPdfError::Launch(message)
    }
}
