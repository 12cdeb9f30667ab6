//! Headless browser automation over the Chrome DevTools Protocol.
//!
//! # Module Structure
//!
//! - [`session`] - Scoped browser session (process, CDP handler, profile dir)
//! - [`lifecycle`] - Load-completion conditions and the navigate-then-wait step
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use webpdf_lib::browser::BrowserSession;
//! use webpdf_lib::config::BrowserSettings;
//!
//! # async fn example() -> webpdf_lib::Result<()> {
//! let session = BrowserSession::launch(&BrowserSettings::default(), Duration::from_secs(20)).await?;
//! let page = session.new_page().await?;
//! // ... drive the page
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod lifecycle;
mod session;

pub(crate) use lifecycle::navigate_and_wait;
pub use lifecycle::{LifecycleWatcher, WaitUntil};
pub use session::BrowserSession;
