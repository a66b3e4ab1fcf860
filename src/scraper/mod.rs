pub mod cleaner;
pub mod error;
pub mod http_client;
pub mod parsers;

use crate::config::{PipelineConfig, ScraperConfig};
use crate::models::Listing;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use url::Url;

pub use self::error::ScrapeError;

use self::cleaner::{clean_desktop_candidates, clean_mobile_candidates};
use self::http_client::{HttpClient, desktop_headers, mobile_headers};
use self::parsers::{extract_desktop_candidates, extract_mobile_candidates};

// ── Source trait ──────────────────────────────────────────────────────────────

/// One fetch + extract strategy.
#[async_trait]
pub trait ListingSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_listings(&self, query: &str) -> Result<Vec<Listing>, ScrapeError>;
}

// ── Marketplace scraper ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Desktop,
    Mobile,
}

pub struct MarketplaceScraper {
    client: HttpClient,
    layout: Layout,
    config: ScraperConfig,
    max_items: usize,
}

impl MarketplaceScraper {
    pub fn new(
        client: HttpClient,
        layout: Layout,
        config: &ScraperConfig,
        pipeline: &PipelineConfig,
    ) -> Self {
        let max_items = match layout {
            Layout::Desktop => pipeline.desktop_max_items,
            Layout::Mobile => pipeline.mobile_max_items,
        };
        Self {
            client,
            layout,
            config: config.clone(),
            max_items,
        }
    }

    /// Search page URL. Desktop asks for newest-first, 50 per page.
    pub fn search_url(&self, query: &str) -> Result<Url, ScrapeError> {
        let url = match self.layout {
            Layout::Desktop => Url::parse_with_params(
                &self.config.desktop_search_url,
                &[("_nkw", query), ("_sop", "10"), ("_ipg", "50")],
            )?,
            Layout::Mobile => {
                Url::parse_with_params(&self.config.mobile_search_url, &[("_nkw", query)])?
            }
        };
        Ok(url)
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, ScrapeError> {
        match self.layout {
            Layout::Desktop => desktop_headers(&self.config.desktop_user_agent),
            Layout::Mobile => mobile_headers(&self.config.mobile_user_agent),
        }
    }

    /// Extract + normalize an already fetched page.
    pub fn parse_page(&self, html: &str, query: &str) -> Vec<Listing> {
        let now_ms = Utc::now().timestamp_millis();
        match self.layout {
            Layout::Desktop => {
                let raw = extract_desktop_candidates(html, self.max_items);
                clean_desktop_candidates(raw, query, &self.config, now_ms)
            }
            Layout::Mobile => {
                let raw = extract_mobile_candidates(html, self.max_items);
                clean_mobile_candidates(raw, query, &self.config, now_ms)
            }
        }
    }
}

#[async_trait]
impl ListingSource for MarketplaceScraper {
    fn name(&self) -> &'static str {
        match self.layout {
            Layout::Desktop => "desktop",
            Layout::Mobile => "mobile",
        }
    }

    async fn fetch_listings(&self, query: &str) -> Result<Vec<Listing>, ScrapeError> {
        let url = self.search_url(query)?;
        let html = self.client.get_text(&url, self.headers()?).await?;
        debug!("{}: fetched {} bytes", self.name(), html.len());

        Ok(self.parse_page(&html, query))
    }
}
