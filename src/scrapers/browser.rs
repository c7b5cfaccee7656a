use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Shared headless Chrome session, launched once per pipeline run.
///
/// The main tab lives for the whole run; detail lookups borrow short-lived
/// tabs through [`BrowserSession::open_tab`] and must release them with
/// [`BrowserSession::close_tab`] on every path.
pub struct BrowserSession {
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new Chrome instance
    pub fn launch(headless: bool) -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some((1920, 1080)))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser })
    }

    /// Open a new tab with the given default navigation timeout
    pub fn open_tab(&self, timeout: Duration) -> Result<Arc<Tab>> {
        let tab = self
            .browser
            .new_tab()
            .context("Failed to open a new browser tab")?;
        tab.set_default_timeout(timeout);
        Ok(tab)
    }

    /// Close a tab, logging instead of failing if the browser refuses
    pub fn close_tab(&self, tab: &Tab) {
        if let Err(e) = tab.close(true) {
            warn!("Failed to close browser tab: {:#}", e);
        }
    }
}
