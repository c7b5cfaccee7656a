use crate::models::{Listing, NOT_AVAILABLE};
use crate::scrapers::browser::BrowserSession;
use crate::scrapers::dom::{select_attr, select_text};
use crate::scrapers::traits::Scraper;
use crate::scrapers::types::ScrapeConfig;
use crate::sink::RecordSink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::Tab;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};
use url::Url;

const SOURCE_URL: &str = "https://www.zrsapartments.com/";
const SITE: &str = "zrsapartments.com";

const CARD_SELECTOR: &str = ".propertieslistings__property--information";
const NAME_SELECTOR: &str = ".propertieslistings__property--name";
const LOCATION_SELECTOR: &str = ".propertieslistings__property--location";
const DETAIL_LINK_SELECTOR: &str = ".propertieslistings__property--link";
const PHONE_SELECTOR: &str = ".header__phone > a > span";
const SMS_PHONE_SELECTOR: &str = ".header__phone--sms span:last-child";

/// Scraper for the zrsapartments.com property directory.
///
/// The directory is a single page; every property's own detail page is the
/// phone source (header number first, SMS label as fallback). One aggregate
/// JSON file is written at the end of the run.
pub struct ZrsApartmentsScraper {
    session: BrowserSession,
    sink: RecordSink,
    config: ScrapeConfig,
}

/// Directory card fields, all required for a usable record
#[derive(Debug)]
struct PropertyCard {
    title: String,
    location: String,
    detail_url: String,
}

impl ZrsApartmentsScraper {
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let session = BrowserSession::launch(config.headless)?;
        let sink = RecordSink::json_only(&config.output_root, SITE)?;
        Ok(Self {
            session,
            sink,
            config,
        })
    }

    fn scrape_directory(&self) -> Result<Vec<Listing>> {
        let tab = self.session.open_tab(self.config.navigation_timeout)?;

        info!("Opening {}...", SOURCE_URL);
        tab.navigate_to(SOURCE_URL)?.wait_until_navigated()?;

        tab.wait_for_element_with_custom_timeout(CARD_SELECTOR, self.config.content_timeout)
            .context("Property listings never appeared")?;

        let html = tab.get_content()?;
        let base = Url::parse(SOURCE_URL)?;
        let listings =
            listings_from_directory(&html, SOURCE_URL, &base, |card| self.lookup_phone(card));

        let json_path = self.sink.write_json("apartments.json", &listings)?;
        info!(
            "Saved {} properties to {}",
            listings.len(),
            json_path.display()
        );

        Ok(listings)
    }

    /// Visit the property's detail page in a short-lived tab and read the phone.
    ///
    /// Navigation and selector misses degrade to `Ok(None)`; only failing to
    /// acquire a tab at all is surfaced to the caller.
    fn lookup_phone(&self, card: &PropertyCard) -> Result<Option<String>> {
        let tab = self.session.open_tab(self.config.navigation_timeout)?;
        let outcome = detail_phone(&tab, card);
        self.session.close_tab(&tab);

        match outcome {
            Ok(phone) => Ok(phone),
            Err(e) => {
                warn!("Detail page lookup failed for {}: {:#}", card.title, e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Scraper for ZrsApartmentsScraper {
    async fn scrape(&self) -> Result<Vec<Listing>> {
        self.scrape_directory()
    }

    fn source_name(&self) -> &'static str {
        SITE
    }
}

fn detail_phone(tab: &Tab, card: &PropertyCard) -> Result<Option<String>> {
    tab.navigate_to(&card.detail_url)?.wait_until_navigated()?;
    let html = tab.get_content()?;
    Ok(parse_detail_phone(&html, &card.title))
}

/// Phone from a property detail page: header number, then the SMS label
fn parse_detail_phone(html: &str, title: &str) -> Option<String> {
    let document = Html::parse_document(html);
    if let Some(phone) = select_text(document.root_element(), PHONE_SELECTOR) {
        return Some(phone);
    }
    warn!(
        "No phone number found for {} in the page header, trying the SMS label",
        title
    );
    select_text(document.root_element(), SMS_PHONE_SELECTOR)
}

fn parse_property_card(card: ElementRef, base: &Url) -> Result<PropertyCard> {
    let title = select_text(card, NAME_SELECTOR).context("Property name missing")?;
    let location = select_text(card, LOCATION_SELECTOR).context("Property location missing")?;
    let href = select_attr(card, DETAIL_LINK_SELECTOR, "href").context("Detail link missing")?;
    let detail_url = base.join(&href).context("Invalid detail link")?.to_string();

    Ok(PropertyCard {
        title,
        location,
        detail_url,
    })
}

/// Extract exactly one record per directory card.
///
/// Unlike the results-page scraper, name and location are required here; a
/// card missing either degrades wholesale to a sentinel record and the loop
/// moves on. `lookup_phone` runs for every usable card.
fn listings_from_directory(
    html: &str,
    source: &str,
    base: &Url,
    mut lookup_phone: impl FnMut(&PropertyCard) -> Result<Option<String>>,
) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let cards = Selector::parse(CARD_SELECTOR).unwrap();
    let parsed: Vec<Result<PropertyCard>> = document
        .select(&cards)
        .map(|card| parse_property_card(card, base))
        .collect();

    parsed
        .into_iter()
        .map(|card| {
            let listing = card.and_then(|card| {
                let phone = lookup_phone(&card)?;
                Ok(Listing {
                    source: source.to_string(),
                    title: card.title,
                    location: card.location,
                    phone: phone.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                })
            });
            match listing {
                Ok(listing) => {
                    info!(
                        "Scraped: {}, {}, {}",
                        listing.title, listing.location, listing.phone
                    );
                    listing
                }
                Err(e) => {
                    warn!("Error scraping property card: {:#}", e);
                    Listing::unavailable(source)
                }
            }
        })
        .collect()
}
