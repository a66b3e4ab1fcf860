use serde::{Deserialize, Serialize};

// ── Listing ───────────────────────────────────────────────────────────────────

/// One normalized marketplace item as returned by `/api/ebay`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: String, // "1234.56", no currency symbol
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bids: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<String>,
    // Only set on generated listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Listing {
    /// Shape invariants every listing leaving the service must satisfy.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty()
            && self.title.chars().count() > 5
            && !self.url.is_empty()
            && self.price.parse::<f64>().map(|p| p > 0.0).unwrap_or(false)
    }
}

// ── Raw extractor output ──────────────────────────────────────────────────────

/// One positionally zipped extractor result, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    pub title: String, // may still contain markup
    pub price: Option<String>, // "1,234.56"
    pub href: Option<String>, // desktop only
}
