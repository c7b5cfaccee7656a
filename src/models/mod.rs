use serde::{Deserialize, Serialize};

/// Sentinel written in place of any field that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// One scraped apartment listing.
///
/// Every field is always populated; extraction failures degrade to the
/// `"N/A"` sentinel instead of dropping the field or the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Origin URL of the run, serialized as `from` in the output files.
    #[serde(rename = "from")]
    pub source: String,
    pub title: String,
    pub location: String,
    pub phone: String,
}

impl Listing {
    /// Fully degraded record, emitted when a whole listing card is unusable.
    pub fn unavailable(source: &str) -> Self {
        Self {
            source: source.to_string(),
            title: NOT_AVAILABLE.to_string(),
            location: NOT_AVAILABLE.to_string(),
            phone: NOT_AVAILABLE.to_string(),
        }
    }
}
