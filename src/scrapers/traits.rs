use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all listing scrapers
/// This allows easy addition of new sites in the future
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Run the full scrape and return every record produced
    async fn scrape(&self) -> Result<Vec<Listing>>;

    /// Get the name of the scraped site
    fn source_name(&self) -> &'static str;
}
