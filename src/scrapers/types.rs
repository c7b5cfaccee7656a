use std::path::PathBuf;
use std::time::Duration;

/// Tunables shared by both scraping pipelines
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Run Chrome without a visible window
    pub headless: bool,
    /// Hard upper bound on the number of result pages to visit
    pub max_pages: u32,
    /// How long to wait for listing content on a freshly loaded page
    pub content_timeout: Duration,
    /// How long to wait for per-page and detail-page navigations
    pub navigation_timeout: Duration,
    /// Root directory for scraped output
    pub output_root: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            headless: true,
            max_pages: 18,
            content_timeout: Duration::from_secs(6_000),
            navigation_timeout: Duration::from_secs(120),
            output_root: PathBuf::from("data"),
        }
    }
}
