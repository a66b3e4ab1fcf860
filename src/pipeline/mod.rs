//! Strategy orchestrator.
//!
//! `search()` walks the strategies in a fixed order:
//!   1. DESKTOP_SCRAPE: desktop results page
//!   2. MOBILE_SCRAPE: mobile results page
//!   3. GENERATE: synthetic listings from the category lexicon
//!
//! A strategy that errors or yields nothing is logged and skipped. The last
//! one cannot fail, so `search()` always returns listings.

use crate::config::AppConfig;
use crate::generator::generate_listings;
use crate::models::Listing;
use crate::scraper::http_client::HttpClient;
use crate::scraper::{Layout, ListingSource, MarketplaceScraper};
use crate::utils::Timer;
use anyhow::{Context, Result};
use chrono::Utc;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DesktopScrape,
    MobileScrape,
    Generate,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::DesktopScrape => "DESKTOP_SCRAPE",
            Strategy::MobileScrape => "MOBILE_SCRAPE",
            Strategy::Generate => "GENERATE",
        })
    }
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub strategy: Strategy,
    pub listings: Vec<Listing>,
}

pub struct Pipeline {
    scrapers: Vec<(Strategy, Box<dyn ListingSource>)>,
    default_query: String,
    generated_max_items: usize,
}

impl Pipeline {
    /// Desktop then mobile scraper over one shared HTTP client.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client =
            HttpClient::new(config.scraper.timeout_secs).context("Failed to build HTTP client")?;

        let desktop = MarketplaceScraper::new(
            client.clone(),
            Layout::Desktop,
            &config.scraper,
            &config.pipeline,
        );
        let mobile =
            MarketplaceScraper::new(client, Layout::Mobile, &config.scraper, &config.pipeline);

        Ok(Self::with_sources(
            config,
            vec![
                (Strategy::DesktopScrape, Box::new(desktop) as Box<dyn ListingSource>),
                (Strategy::MobileScrape, Box::new(mobile) as Box<dyn ListingSource>),
            ],
        ))
    }

    pub fn with_sources(
        config: &AppConfig,
        scrapers: Vec<(Strategy, Box<dyn ListingSource>)>,
    ) -> Self {
        Self {
            scrapers,
            default_query: config.pipeline.default_query.clone(),
            generated_max_items: config.pipeline.generated_max_items,
        }
    }

    /// Blank or missing terms fall back to the configured default. Any other
    /// term is used exactly as given.
    pub fn resolve_query<'a>(&'a self, query: Option<&'a str>) -> &'a str {
        match query {
            Some(q) if !q.trim().is_empty() => q,
            _ => &self.default_query,
        }
    }

    pub async fn search(&self, query: &str) -> SearchOutcome {
        for (strategy, source) in &self.scrapers {
            let timer = Timer::start(source.name());

            match source.fetch_listings(query).await {
                Ok(mut listings) => {
                    listings.retain(Listing::is_well_formed);
                    if !listings.is_empty() {
                        info!(
                            "{} success: {} listings for {:?} in {:.2?}",
                            strategy,
                            listings.len(),
                            query,
                            timer.elapsed()
                        );
                        return SearchOutcome { strategy: *strategy, listings };
                    }
                    warn!("{} returned no listings for {:?}", strategy, query);
                }
                Err(e) if e.is_timeout() => warn!("{} timed out: {}", strategy, e),
                Err(e) => warn!("{} failed: {}", strategy, e),
            }
        }

        let now_ms = Utc::now().timestamp_millis();
        let listings = generate_listings(query, self.generated_max_items, now_ms);
        info!("Using simulated data: {} listings for {:?}", listings.len(), query);
        SearchOutcome { strategy: Strategy::Generate, listings }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::generator::SIMULATION_SOURCE;
    use crate::scraper::ScrapeError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned source for orchestration tests.
    pub(crate) enum Stub {
        Fails,
        Empty,
        Returns(Vec<Listing>),
    }

    pub(crate) struct StubSource {
        pub behaviour: Stub,
        pub calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        pub(crate) fn boxed(behaviour: Stub) -> (Box<dyn ListingSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let src = StubSource { behaviour, calls: Arc::clone(&calls) };
            (Box::new(src) as Box<dyn ListingSource>, calls)
        }
    }

    #[async_trait]
    impl ListingSource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch_listings(&self, _query: &str) -> Result<Vec<Listing>, ScrapeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Stub::Fails => Err(ScrapeError::InvalidUrl(url::ParseError::EmptyHost)),
                Stub::Empty => Ok(vec![]),
                Stub::Returns(listings) => Ok(listings.clone()),
            }
        }
    }

    pub(crate) fn scraped(title: &str) -> Listing {
        Listing {
            id: "ebay-0-1".into(),
            title: title.into(),
            price: "10.00".into(),
            url: "https://www.ebay.com/itm/1".into(),
            ..Default::default()
        }
    }

    fn pipeline(desktop: Box<dyn ListingSource>, mobile: Box<dyn ListingSource>) -> Pipeline {
        Pipeline::with_sources(
            &AppConfig::default(),
            vec![(Strategy::DesktopScrape, desktop), (Strategy::MobileScrape, mobile)],
        )
    }

    #[tokio::test]
    async fn test_desktop_success_short_circuits() {
        let (desktop, _) = StubSource::boxed(Stub::Returns(vec![scraped("Desktop listing")]));
        let (mobile, mobile_calls) = StubSource::boxed(Stub::Fails);

        let out = pipeline(desktop, mobile).search("watches").await;
        assert_eq!(out.strategy, Strategy::DesktopScrape);
        assert_eq!(out.listings[0].title, "Desktop listing");
        assert_eq!(mobile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_desktop_error_falls_through_to_mobile() {
        let (desktop, desktop_calls) = StubSource::boxed(Stub::Fails);
        let (mobile, _) = StubSource::boxed(Stub::Returns(vec![scraped("Mobile listing")]));

        let out = pipeline(desktop, mobile).search("watches").await;
        assert_eq!(out.strategy, Strategy::MobileScrape);
        assert_eq!(desktop_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_generates() {
        let (desktop, desktop_calls) = StubSource::boxed(Stub::Empty);
        let (mobile, mobile_calls) = StubSource::boxed(Stub::Fails);

        let out = pipeline(desktop, mobile).search("xyzzy").await;
        assert_eq!(out.strategy, Strategy::Generate);
        assert_eq!(out.listings.len(), 8);
        assert!(out.listings.iter().all(|l| l.source.as_deref() == Some(SIMULATION_SOURCE)));
        assert!(out.listings.iter().all(|l| l.title.contains("xyzzy")));

        // No strategy retries.
        assert_eq!(desktop_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mobile_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolve_query() {
        let (a, _) = StubSource::boxed(Stub::Empty);
        let (b, _) = StubSource::boxed(Stub::Empty);
        let p = pipeline(a, b);

        assert_eq!(p.resolve_query(None), "vintage watches");
        assert_eq!(p.resolve_query(Some("   ")), "vintage watches");
        assert_eq!(p.resolve_query(Some(" shoes ")), " shoes ");
        assert_eq!(p.resolve_query(Some("")), "vintage watches");
    }
}
