use crate::models::RawCandidate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// ── Patterns ──────────────────────────────────────────────────────────────────
//
// Each list is tried in order; the first pattern with any match wins.

mod patterns {
    use super::*;

    fn compile(src: &str) -> Regex {
        Regex::new(src).expect("static pattern must compile")
    }

    pub static DESKTOP_TITLES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        vec![
            compile(r#"<span[^>]*role="heading"[^>]*aria-level="3"[^>]*>([^<]+)</span>"#),
            compile(r#"<h3[^>]*class="[^"]*s-item__title[^"]*"[^>]*>([^<]+)</h3>"#),
            compile(r#"<span[^>]*class="[^"]*clipped[^"]*"[^>]*>([^<]+)</span>"#),
        ]
    });

    pub static DESKTOP_PRICES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        vec![
            compile(r#"<span[^>]*class="[^"]*s-item__price[^"]*"[^>]*>\$([0-9,]+\.?[0-9]*)</span>"#),
            compile(r#"<span[^>]*class="[^"]*price[^"]*"[^>]*>\$([0-9,]+\.?[0-9]*)</span>"#),
            compile(r#"\$([0-9,]+\.?[0-9]*)"#),
        ]
    });

    pub static DESKTOP_HREFS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        vec![
            compile(r#"<a[^>]*href="([^"]*itm[^"]*)"[^>]*>"#),
            compile(r#"<a[^>]*href="([^"]*/itm/[^"]*)"[^>]*>"#),
        ]
    });

    pub static MOBILE_TITLE: LazyLock<Regex> =
        LazyLock::new(|| compile(r#"<span[^>]*class="[^"]*title[^"]*"[^>]*>([^<]+)</span>"#));

    pub static MOBILE_PRICE: LazyLock<Regex> =
        LazyLock::new(|| compile(r#"\$([0-9,]+\.?[0-9]*)"#));
}

/// Which capture to keep from each match.
#[derive(Clone, Copy)]
enum Keep {
    Whole,
    Group1,
}

fn collect(re: &Regex, html: &str, keep: Keep) -> Vec<String> {
    match keep {
        Keep::Whole => re.find_iter(html).map(|m| m.as_str().to_string()).collect(),
        Keep::Group1 => re
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect(),
    }
}

fn first_non_empty(candidates: &[Regex], html: &str, keep: Keep) -> Vec<String> {
    candidates
        .iter()
        .map(|re| collect(re, html, keep))
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

// ── Desktop results page ──────────────────────────────────────────────────────

/// Zip titles, prices and hrefs positionally, stopping at the shortest list
/// or `max`, whichever comes first.
///
/// Titles keep their surrounding markup; the cleaner strips it.
pub fn extract_desktop_candidates(html: &str, max: usize) -> Vec<RawCandidate> {
    let titles = first_non_empty(&patterns::DESKTOP_TITLES, html, Keep::Whole);
    let prices = first_non_empty(&patterns::DESKTOP_PRICES, html, Keep::Group1);
    let hrefs = first_non_empty(&patterns::DESKTOP_HREFS, html, Keep::Group1);

    debug!(
        "Desktop parse: {} titles, {} prices, {} URLs",
        titles.len(),
        prices.len(),
        hrefs.len()
    );

    titles
        .into_iter()
        .zip(prices)
        .zip(hrefs)
        .take(max)
        .map(|((title, price), href)| RawCandidate {
            title,
            price: Some(price),
            href: Some(href),
        })
        .collect()
}

// ── Mobile results page ───────────────────────────────────────────────────────

pub fn extract_mobile_candidates(html: &str, max: usize) -> Vec<RawCandidate> {
    let titles = collect(&patterns::MOBILE_TITLE, html, Keep::Whole);
    let prices = collect(&patterns::MOBILE_PRICE, html, Keep::Group1);

    debug!("Mobile parse: {} titles, {} prices", titles.len(), prices.len());

    titles
        .into_iter()
        .zip(prices)
        .take(max)
        .map(|(title, price)| RawCandidate { title, price: Some(price), href: None })
        .collect()
}
