use crate::config::ScraperConfig;
use crate::models::{Listing, RawCandidate};
use crate::utils::random_base36;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MIN_TITLE_CHARS: usize = 6;

pub const CONDITIONS: [&str; 4] = ["New", "Used", "Pre-owned", "Refurbished"];

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

// ── Text ──────────────────────────────────────────────────────────────────────

pub fn strip_tags(s: &str) -> String {
    TAG.replace_all(s, "").trim().to_string()
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Stripped title, or `None` when too short to be a real listing.
pub fn clean_title(raw: &str) -> Option<String> {
    let title = strip_tags(raw);
    if title.chars().count() < MIN_TITLE_CHARS {
        return None;
    }
    Some(truncate_chars(&title, MAX_TITLE_CHARS))
}

// ── Price ─────────────────────────────────────────────────────────────────────

/// Strip thousands separators and keep the text only if it is a positive number.
/// "1,234.56" → "1234.56" | "0" → None | "," → None
pub fn clean_price(s: &str) -> Option<String> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(p) if p > 0.0 && p.is_finite() => Some(cleaned),
        _ => None,
    }
}

// ── URLs ──────────────────────────────────────────────────────────────────────

/// Absolute hrefs pass through; anything else is joined onto `origin`.
pub fn resolve_url(href: &str, origin: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    match Url::parse(origin).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", origin.trim_end_matches('/'), href),
    }
}

pub fn placeholder_image(color: &str, text: &str) -> String {
    let text: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("https://via.placeholder.com/200x150/{color}/FFFFFF?text={text}")
}

// ── Fabricated metadata ───────────────────────────────────────────────────────
//
// None of this is read from the page.

pub fn condition_for(index: usize) -> &'static str {
    CONDITIONS[index % CONDITIONS.len()]
}

/// Every third listing ships free; the rest get a paid amount in `[lo, hi)`.
pub fn shipping_for(index: usize, lo: f64, hi: f64) -> String {
    if index % 3 == 0 {
        "Free shipping".to_string()
    } else {
        format!("${:.2} shipping", rand::random_range(lo..hi))
    }
}

pub fn random_time_left(max_days: u32) -> String {
    format!(
        "{}d {}h",
        rand::random_range(1..=max_days),
        rand::random_range(0..24u32)
    )
}

// ── Candidates → Listings ─────────────────────────────────────────────────────

pub fn clean_desktop_candidates(
    candidates: Vec<RawCandidate>,
    query: &str,
    cfg: &ScraperConfig,
    now_ms: i64,
) -> Vec<Listing> {
    let image = placeholder_image("4A90E2", query);
    let total = candidates.len();

    let listings: Vec<Listing> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let title = clean_title(&raw.title)?;
            let price = raw
                .price
                .as_deref()
                .and_then(clean_price)
                .unwrap_or_else(|| rand::random_range(10..1010u32).to_string());
            let href = raw.href.unwrap_or_else(|| format!("#listing-{i}"));

            Some(Listing {
                id: format!("ebay-{i}-{now_ms}"),
                title,
                price,
                url: resolve_url(&href, &cfg.site_origin),
                image: Some(image.clone()),
                condition: Some(condition_for(i).to_string()),
                shipping: Some(shipping_for(i, 5.0, 25.0)),
                bids: Some(rand::random_range(0..15)),
                time_left: Some(random_time_left(7)),
                ..Default::default()
            })
        })
        .collect();

    debug!("Desktop clean: kept {}/{} candidates", listings.len(), total);
    listings
}

pub fn clean_mobile_candidates(
    candidates: Vec<RawCandidate>,
    query: &str,
    cfg: &ScraperConfig,
    now_ms: i64,
) -> Vec<Listing> {
    let image = placeholder_image("E74C3C", query);
    let total = candidates.len();

    let listings: Vec<Listing> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let title = clean_title(&raw.title)?;
            let price = raw
                .price
                .as_deref()
                .and_then(clean_price)
                .unwrap_or_else(|| format!("{:.2}", rand::random_range(20.0..520.0)));

            Some(Listing {
                id: format!("mobile-{i}-{now_ms}"),
                title,
                price,
                url: format!("{}{}", cfg.mobile_item_url, random_base36(6)),
                image: Some(image.clone()),
                condition: Some("Used".to_string()),
                shipping: Some("Standard shipping".to_string()),
                ..Default::default()
            })
        })
        .collect();

    debug!("Mobile clean: kept {}/{} candidates", listings.len(), total);
    listings
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, price: Option<&str>, href: Option<&str>) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            price: price.map(str::to_string),
            href: href.map(str::to_string),
        }
    }

    #[test]
    fn test_title_length_boundary() {
        assert_eq!(clean_title("<h3>Fivec</h3>"), None);
        assert_eq!(clean_title("<h3>Sixchr</h3>").as_deref(), Some("Sixchr"));
        assert_eq!(clean_title("   <b> </b>  "), None);
    }

    #[test]
    fn test_title_truncated_to_100_chars() {
        let long = format!("<span>{}</span>", "é".repeat(150));
        assert_eq!(clean_title(&long).unwrap().chars().count(), 100);
    }

    #[test]
    fn test_clean_price() {
        assert_eq!(clean_price("1,234.56").as_deref(), Some("1234.56"));
        assert_eq!(clean_price("19").as_deref(), Some("19"));
        assert_eq!(clean_price("0"), None);
        assert_eq!(clean_price(","), None);
        assert_eq!(clean_price(""), None);
    }

    #[test]
    fn test_resolve_url() {
        let origin = "https://www.ebay.com";
        assert_eq!(resolve_url("/itm/123", origin), "https://www.ebay.com/itm/123");
        assert_eq!(
            resolve_url("https://www.ebay.com/itm/9", origin),
            "https://www.ebay.com/itm/9"
        );
        assert!(resolve_url("#listing-2", origin).ends_with("#listing-2"));
    }

    #[test]
    fn test_condition_cycles_and_shipping_rule() {
        assert_eq!(condition_for(0), "New");
        assert_eq!(condition_for(3), "Refurbished");
        assert_eq!(condition_for(5), "Used");
        assert_eq!(shipping_for(0, 5.0, 25.0), "Free shipping");
        assert_eq!(shipping_for(6, 5.0, 25.0), "Free shipping");
        let paid = shipping_for(1, 5.0, 25.0);
        assert!(paid.starts_with('$') && paid.ends_with(" shipping"), "{paid}");
    }

    #[test]
    fn test_time_left_shape() {
        for _ in 0..50 {
            let t = random_time_left(7);
            let (d, h) = t.split_once(' ').unwrap();
            let days: u32 = d.trim_end_matches('d').parse().unwrap();
            let hours: u32 = h.trim_end_matches('h').parse().unwrap();
            assert!((1..=7).contains(&days));
            assert!(hours < 24);
        }
    }

    #[test]
    fn test_desktop_candidates_become_listings() {
        let cfg = ScraperConfig::default();
        let raw = vec![
            candidate("<h3>Omega Seamaster</h3>", Some("2,450.00"), Some("/itm/1")),
            candidate("<h3>Tiny</h3>", Some("5.00"), Some("/itm/2")),
            candidate("<h3>Casio Royale</h3>", Some(","), Some("https://www.ebay.com/itm/3")),
        ];

        let listings = clean_desktop_candidates(raw, "watches", &cfg, 42);
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].id, "ebay-0-42");
        assert_eq!(listings[0].title, "Omega Seamaster");
        assert_eq!(listings[0].price, "2450.00");
        assert_eq!(listings[0].url, "https://www.ebay.com/itm/1");
        assert_eq!(listings[0].condition.as_deref(), Some("New"));
        assert_eq!(listings[0].shipping.as_deref(), Some("Free shipping"));

        // Source index is kept for ids and the condition cycle.
        assert_eq!(listings[1].id, "ebay-2-42");
        assert_eq!(listings[1].condition.as_deref(), Some("Pre-owned"));
        assert!(listings.iter().all(Listing::is_well_formed));
        assert!(listings.iter().all(|l| l.source.is_none()));
    }

    #[test]
    fn test_mobile_candidates_become_listings() {
        let cfg = ScraperConfig::default();
        let raw = vec![candidate("<span>Mobile Seiko 5</span>", Some("1,050"), None)];

        let listings = clean_mobile_candidates(raw, "seiko", &cfg, 7);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "mobile-0-7");
        assert_eq!(listings[0].price, "1050");
        assert!(listings[0].url.starts_with("https://m.ebay.com/itm/"));
        assert_eq!(listings[0].condition.as_deref(), Some("Used"));
        assert!(listings[0].bids.is_none());
        assert!(listings[0].is_well_formed());
    }

    #[test]
    fn test_placeholder_image_encodes_query() {
        let img = placeholder_image("4A90E2", "vintage watches");
        assert!(img.ends_with("?text=vintage+watches"));
    }
}
