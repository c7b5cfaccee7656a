pub mod apartments;
pub mod browser;
pub mod dom;
pub mod traits;
pub mod types;
pub mod zrs;

pub use apartments::ApartmentsComScraper;
pub use traits::Scraper;
pub use types::ScrapeConfig;
pub use zrs::ZrsApartmentsScraper;
