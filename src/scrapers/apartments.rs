use crate::models::{Listing, NOT_AVAILABLE};
use crate::scrapers::browser::BrowserSession;
use crate::scrapers::dom::{select_attr, select_text};
use crate::scrapers::traits::Scraper;
use crate::scrapers::types::ScrapeConfig;
use crate::sink::RecordSink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Element, Tab};
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};
use url::Url;

const SOURCE_URL: &str = "https://www.apartments.com/chicago-il/";
const SITE: &str = "apartments.com";

const RESULTS_SELECTOR: &str = ".searchResults";
const CARD_SELECTOR: &str = ".placard";
const TITLE_SELECTOR: &str = ".property-title";
const ADDRESS_SELECTOR: &str = ".property-address";
const INLINE_PHONE_SELECTOR: &str = ".phone-link";
const DETAIL_LINK_SELECTOR: &str = "a";
const DETAIL_PHONE_SELECTOR: &str = ".ctaContainer .phoneLabel .phoneNumber";
const NEXT_PAGE_SELECTOR: &str = "a.next";

/// Paginated scraper for apartments.com search results.
///
/// Walks result pages up to the configured ceiling, persists every page as
/// JSON and CSV before advancing, and falls back to each listing's detail
/// page when the card carries no inline phone number.
pub struct ApartmentsComScraper {
    session: BrowserSession,
    sink: RecordSink,
    config: ScrapeConfig,
}

/// Raw card fields; `None` marks a selector that produced nothing
#[derive(Debug)]
struct PlacardFields {
    title: Option<String>,
    location: Option<String>,
    phone: Option<String>,
    detail_href: Option<String>,
}

impl ApartmentsComScraper {
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let session = BrowserSession::launch(config.headless)?;
        let sink = RecordSink::json_and_csv(&config.output_root, SITE)?;
        Ok(Self {
            session,
            sink,
            config,
        })
    }

    fn scrape_pages(&self) -> Result<Vec<Listing>> {
        let tab = self.session.open_tab(self.config.navigation_timeout)?;

        info!("Opening {}...", SOURCE_URL);
        tab.navigate_to(SOURCE_URL)?.wait_until_navigated()?;

        let mut listings = Vec::new();
        let mut page = 1u32;

        loop {
            tab.wait_for_element_with_custom_timeout(RESULTS_SELECTOR, self.config.content_timeout)
                .context("Search results never appeared")?;

            let html = tab.get_content()?;
            let batch =
                listings_from_page(&html, SOURCE_URL, |href| self.lookup_detail_phone(href));

            let json_path = self.sink.write_json(&format!("page{}.json", page), &batch)?;
            info!(
                "Scraped {} apartments from page {} and saved to {}",
                batch.len(),
                page,
                json_path.display()
            );
            let csv_path = self.sink.write_csv(&format!("page{}.csv", page), &batch)?;
            info!("Saved page {} as CSV to {}", page, csv_path.display());

            listings.extend(batch);

            if page >= self.config.max_pages {
                info!(
                    "Reached the page limit of {}. Stopping pagination.",
                    self.config.max_pages
                );
                break;
            }

            let next = match tab.find_element(NEXT_PAGE_SELECTOR) {
                Ok(next) => next,
                Err(_) => {
                    info!("No next-page control found. Stopping pagination.");
                    break;
                }
            };

            if let Err(e) = advance(&next, &tab) {
                warn!("Navigation to page {} failed: {:#}", page + 1, e);
                break;
            }
            page += 1;
        }

        Ok(listings)
    }

    /// Visit a listing's detail page in a short-lived tab and read the phone.
    ///
    /// Navigation and selector misses degrade to `Ok(None)`; only failing to
    /// acquire a tab at all is surfaced to the caller.
    fn lookup_detail_phone(&self, href: Option<&str>) -> Result<Option<String>> {
        let Some(href) = href else {
            return Ok(None);
        };
        let detail_url = Url::parse(SOURCE_URL)
            .and_then(|base| base.join(href))
            .context("Invalid detail link")?;

        let tab = self.session.open_tab(self.config.navigation_timeout)?;
        let outcome = detail_phone(&tab, detail_url.as_str());
        self.session.close_tab(&tab);

        match outcome {
            Ok(phone) => Ok(phone),
            Err(e) => {
                warn!("Detail page lookup failed for {}: {:#}", detail_url, e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Scraper for ApartmentsComScraper {
    async fn scrape(&self) -> Result<Vec<Listing>> {
        self.scrape_pages()
    }

    fn source_name(&self) -> &'static str {
        SITE
    }
}

fn advance(next: &Element, tab: &Tab) -> Result<()> {
    next.click()?;
    tab.wait_until_navigated()?;
    Ok(())
}

fn detail_phone(tab: &Tab, url: &str) -> Result<Option<String>> {
    tab.navigate_to(url)?.wait_until_navigated()?;
    let html = tab.get_content()?;
    Ok(parse_detail_phone(&html))
}

fn parse_detail_phone(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    select_text(document.root_element(), DETAIL_PHONE_SELECTOR)
}

fn parse_placard(card: ElementRef) -> PlacardFields {
    PlacardFields {
        title: select_text(card, TITLE_SELECTOR),
        location: select_text(card, ADDRESS_SELECTOR),
        phone: select_text(card, INLINE_PHONE_SELECTOR),
        detail_href: select_attr(card, DETAIL_LINK_SELECTOR, "href"),
    }
}

/// Extract exactly one record per listing card on a results page.
///
/// Fields fail independently into the sentinel. `lookup_phone` is consulted
/// only for cards without an inline phone; an `Err` from it degrades that one
/// card to a fully-sentinel record while the rest keep processing.
fn listings_from_page(
    html: &str,
    source: &str,
    mut lookup_phone: impl FnMut(Option<&str>) -> Result<Option<String>>,
) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let cards = Selector::parse(CARD_SELECTOR).unwrap();
    let fields: Vec<PlacardFields> = document.select(&cards).map(parse_placard).collect();

    fields
        .into_iter()
        .map(|card| {
            let phone = match &card.phone {
                Some(phone) => Ok(Some(phone.clone())),
                None => lookup_phone(card.detail_href.as_deref()),
            };
            match phone {
                Ok(phone) => Listing {
                    source: source.to_string(),
                    title: card.title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    location: card.location.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    phone: phone.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                },
                Err(e) => {
                    warn!("Error scraping apartment card: {:#}", e);
                    Listing::unavailable(source)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    const SOURCE: &str = "https://www.apartments.com/chicago-il/";

    fn page(cards: &[&str]) -> String {
        format!(
            r#"<html><body><div class="searchResults">{}</div></body></html>"#,
            cards.concat()
        )
    }

    const FULL_CARD: &str = concat!(
        r#"<article class="placard">"#,
        r#"<a href="https://www.apartments.com/oak-tower/">"#,
        r#"<span class="property-title">Oak Tower</span></a>"#,
        r#"<div class="property-address">123 Main St</div>"#,
        r#"<a class="phone-link">555-0100</a>"#,
        r#"</article>"#,
    );

    const CARD_WITHOUT_PHONE: &str = concat!(
        r#"<article class="placard">"#,
        r#"<a href="/elm-court/"><span class="property-title">Elm Court</span></a>"#,
        r#"<div class="property-address">9 Elm Ave</div>"#,
        r#"</article>"#,
    );

    const EMPTY_CARD: &str = r#"<article class="placard"><p>advert</p></article>"#;

    #[test]
    fn inline_phone_skips_the_detail_lookup() {
        let mut lookups = 0;
        let records = listings_from_page(&page(&[FULL_CARD]), SOURCE, |_| {
            lookups += 1;
            Ok(None)
        });

        assert_eq!(lookups, 0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Oak Tower");
        assert_eq!(records[0].location, "123 Main St");
        assert_eq!(records[0].phone, "555-0100");
        assert_eq!(records[0].source, SOURCE);
    }

    #[test]
    fn detail_lookup_fills_missing_phone() {
        let mut seen = Vec::new();
        let records = listings_from_page(&page(&[CARD_WITHOUT_PHONE]), SOURCE, |href| {
            seen.push(href.map(str::to_string));
            Ok(Some("555-0199".to_string()))
        });

        assert_eq!(seen, vec![Some("/elm-court/".to_string())]);
        assert_eq!(records[0].phone, "555-0199");
        assert_eq!(records[0].title, "Elm Court");
    }

    #[test]
    fn phone_is_sentinel_only_when_every_source_failed() {
        let records = listings_from_page(&page(&[CARD_WITHOUT_PHONE]), SOURCE, |_| Ok(None));
        assert_eq!(records[0].phone, NOT_AVAILABLE);
        assert_eq!(records[0].title, "Elm Court");
        assert_eq!(records[0].location, "9 Elm Ave");
    }

    #[test]
    fn fields_degrade_independently() {
        let records = listings_from_page(&page(&[EMPTY_CARD]), SOURCE, |_| Ok(None));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, NOT_AVAILABLE);
        assert_eq!(records[0].location, NOT_AVAILABLE);
        assert_eq!(records[0].phone, NOT_AVAILABLE);
    }

    #[test]
    fn one_record_per_card_even_when_a_lookup_blows_up() {
        let cards = page(&[FULL_CARD, CARD_WITHOUT_PHONE, CARD_WITHOUT_PHONE]);
        let mut calls = 0;
        let records = listings_from_page(&cards, SOURCE, |_| {
            calls += 1;
            if calls == 1 {
                bail!("tab acquisition failed");
            }
            Ok(Some("555-0142".to_string()))
        });

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].phone, "555-0100");
        // second card hit the failing lookup and degraded wholesale
        assert_eq!(records[1].title, NOT_AVAILABLE);
        assert_eq!(records[1].phone, NOT_AVAILABLE);
        assert_eq!(records[2].title, "Elm Court");
        assert_eq!(records[2].phone, "555-0142");
    }

    #[test]
    fn page_without_cards_yields_no_records() {
        let records = listings_from_page(&page(&[]), SOURCE, |_| Ok(None));
        assert!(records.is_empty());
    }

    #[test]
    fn detail_page_phone_is_parsed_from_the_cta_block() {
        let html = concat!(
            r#"<html><body><div class="ctaContainer"><div class="phoneLabel">"#,
            r#"<span class="phoneNumber"> 555-0100 </span>"#,
            r#"</div></div></body></html>"#,
        );
        assert_eq!(parse_detail_phone(html).as_deref(), Some("555-0100"));
        assert_eq!(parse_detail_phone("<html><body></body></html>"), None);
    }
}
