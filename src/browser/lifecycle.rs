//! Load-completion conditions and the navigate-then-wait sequence.
//!
//! Chrome reports per-frame lifecycle milestones (`DOMContentLoaded`,
//! `load`, `networkAlmostIdle`, `networkIdle`) over CDP once lifecycle
//! events are enabled. Navigation is complete when the milestone selected by
//! [`WaitUntil`] has fired for the main frame of the navigation's loader.

use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, NavigateParams, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::{Result, WebPdfError};

/// Condition that marks a navigation as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    /// The `load` event fired.
    Load,
    /// The `DOMContentLoaded` event fired.
    DomContentLoaded,
    /// No network connections for at least 500 ms.
    NetworkIdle0,
    /// At most two network connections for at least 500 ms.
    #[default]
    NetworkIdle2,
}

impl WaitUntil {
    /// Name of the CDP lifecycle event this condition waits for.
    pub fn lifecycle_event(&self) -> &'static str {
        match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "DOMContentLoaded",
            WaitUntil::NetworkIdle0 => "networkIdle",
            WaitUntil::NetworkIdle2 => "networkAlmostIdle",
        }
    }
}

impl std::fmt::Display for WaitUntil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "domcontentloaded",
            WaitUntil::NetworkIdle0 => "networkidle0",
            WaitUntil::NetworkIdle2 => "networkidle2",
        };
        f.write_str(name)
    }
}

/// Tracks lifecycle events for one navigation of one frame.
#[derive(Debug, Clone)]
pub struct LifecycleWatcher {
    frame_id: String,
    loader_id: Option<String>,
    target: WaitUntil,
    complete: bool,
}

impl LifecycleWatcher {
    /// `loader_id` is `None` for same-document navigations, which never
    /// produce a new set of lifecycle events and count as complete.
    pub fn new(frame_id: impl Into<String>, loader_id: Option<String>, target: WaitUntil) -> Self {
        let complete = loader_id.is_none();
        Self {
            frame_id: frame_id.into(),
            loader_id,
            target,
            complete,
        }
    }

    /// Feed one lifecycle event; returns whether the navigation is complete.
    pub fn observe(&mut self, frame_id: &str, loader_id: &str, name: &str) -> bool {
        if self.complete {
            return true;
        }
        if frame_id != self.frame_id || self.loader_id.as_deref() != Some(loader_id) {
            return false;
        }
        if name == self.target.lifecycle_event() {
            self.complete = true;
        }
        self.complete
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Navigates `page` to `url` and waits until `wait_until` is reached.
///
/// Carries no deadline of its own; callers bound it with a timeout.
pub(crate) async fn navigate_and_wait(page: &Page, url: &str, wait_until: WaitUntil) -> Result<()> {
    page.execute(SetLifecycleEventsEnabledParams::new(true))
        .await?;
    // Subscribe before navigating so no event of the new loader is missed.
    let mut events = page.event_listener::<EventLifecycleEvent>().await?;

    debug!(url, %wait_until, "navigating");
    let response = page.execute(NavigateParams::new(url)).await.map_err(|err| {
        WebPdfError::navigation(url, err.to_string())
    })?;
    let navigation = &response.result;

    if let Some(error_text) = navigation
        .error_text
        .as_deref()
        .filter(|text| !text.is_empty())
    {
        return Err(WebPdfError::navigation(url, error_text));
    }

    let mut watcher = LifecycleWatcher::new(
        navigation.frame_id.inner().clone(),
        navigation
            .loader_id
            .as_ref()
            .map(|loader| loader.inner().clone()),
        wait_until,
    );

    while !watcher.is_complete() {
        let Some(event) = events.next().await else {
            return Err(WebPdfError::navigation(
                url,
                "page closed before it finished loading",
            ));
        };
        trace!(
            frame = %event.frame_id.inner(),
            loader = %event.loader_id.inner(),
            name = %event.name,
            "lifecycle event"
        );
        watcher.observe(event.frame_id.inner(), event.loader_id.inner(), &event.name);
    }

    debug!(url, event = wait_until.lifecycle_event(), "page settled");
    Ok(())
}
