//! Fallback listing generator.
//!
//! Used when both scrape strategies come back empty. Shapes are fixed by a
//! small category lexicon; prices and metadata are random on every call.

use crate::models::Listing;
use crate::scraper::cleaner::{condition_for, placeholder_image, random_time_left, shipping_for};
use crate::utils::random_base36;
use std::ops::Range;

pub const SIMULATION_SOURCE: &str = "realistic_simulation";

// ── Lexicon ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Watches,
    Shoes,
    Electronics,
    Default,
}

pub const WATCHES: [&str; 8] = [
    "Vintage Rolex Submariner Watch",
    "Omega Speedmaster Professional",
    "Seiko Automatic Diver Watch",
    "Casio G-Shock Digital Watch",
    "Citizen Eco-Drive Solar Watch",
    "TAG Heuer Formula 1 Watch",
    "Timex Weekender Watch",
    "Apple Watch Series 8",
];

pub const SHOES: [&str; 8] = [
    "Nike Air Jordan 1 Retro High",
    "Adidas Ultraboost 22 Running Shoes",
    "Converse Chuck Taylor All Star",
    "Vans Old Skool Sneakers",
    "New Balance 990v5 Sneakers",
    "Puma RS-X Reinvention",
    "Reebok Classic Leather",
    "Under Armour HOVR Phantom",
];

pub const ELECTRONICS: [&str; 8] = [
    "Apple iPhone 14 Pro Max",
    "Samsung Galaxy S23 Ultra",
    "Sony WH-1000XM4 Headphones",
    "iPad Air 5th Generation",
    "MacBook Pro 14-inch M2",
    "Nintendo Switch OLED",
    "PlayStation 5 Console",
    "Dell XPS 13 Laptop",
];

/// `{}` is replaced with the search term.
pub const DEFAULT_TEMPLATES: [&str; 8] = [
    "Vintage {} Collection",
    "Professional {} Set",
    "Premium {} Bundle",
    "Collector's {} Edition",
    "Rare {} Find",
    "Limited Edition {}",
    "High-Quality {}",
    "Authentic {} Item",
];

impl Category {
    /// First category whose name appears anywhere in the query, ignoring case.
    pub fn detect(query: &str) -> Self {
        let q = query.to_lowercase();
        [
            ("watches", Category::Watches),
            ("shoes", Category::Shoes),
            ("electronics", Category::Electronics),
        ]
        .into_iter()
        .find(|(name, _)| q.contains(name))
        .map(|(_, cat)| cat)
        .unwrap_or(Category::Default)
    }

    pub fn titles(self, query: &str) -> Vec<String> {
        let fixed =
            |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        match self {
            Category::Watches => fixed(&WATCHES[..]),
            Category::Shoes => fixed(&SHOES[..]),
            Category::Electronics => fixed(&ELECTRONICS[..]),
            Category::Default => DEFAULT_TEMPLATES
                .iter()
                .map(|t| t.replace("{}", query))
                .collect(),
        }
    }

    /// Whole-dollar price range.
    pub fn price_range(self) -> Range<u32> {
        match self {
            Category::Electronics => 200..2200,
            Category::Watches => 100..5100,
            Category::Shoes | Category::Default => 25..325,
        }
    }
}

// ── Generation ────────────────────────────────────────────────────────────────

/// Up to `max` synthetic listings for `query`. Never fails.
pub fn generate_listings(query: &str, max: usize, now_ms: i64) -> Vec<Listing> {
    let category = Category::detect(query);

    category
        .titles(query)
        .into_iter()
        .take(max)
        .enumerate()
        .map(|(i, title)| {
            let first_word = title.split(' ').next().unwrap_or_default().to_string();
            Listing {
                id: format!("realistic-{i}-{now_ms}"),
                price: rand::random_range(category.price_range()).to_string(),
                url: format!("https://www.ebay.com/itm/realistic-{now_ms}-{i}"),
                image: Some(placeholder_image("27AE60", &first_word)),
                condition: Some(condition_for(i).to_string()),
                shipping: Some(shipping_for(i, 3.0, 18.0)),
                bids: Some(rand::random_range(0..20)),
                time_left: Some(random_time_left(6)),
                seller: Some(format!("seller_{}", random_base36(6))),
                rating: Some(format!("{:.1}", rand::random_range(4.0..5.0))),
                source: Some(SIMULATION_SOURCE.to_string()),
                title,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_category() {
        assert_eq!(Category::detect("watches"), Category::Watches);
        assert_eq!(Category::detect("Vintage WATCHES lot"), Category::Watches);
        assert_eq!(Category::detect("running shoes"), Category::Shoes);
        assert_eq!(Category::detect("used electronics"), Category::Electronics);
        assert_eq!(Category::detect("xyzzy"), Category::Default);
        assert_eq!(Category::detect(""), Category::Default);
    }

    #[test]
    fn test_watches_come_from_watch_lexicon() {
        let listings = generate_listings("watches", 8, 1);
        assert_eq!(listings.len(), 8);
        for l in &listings {
            assert!(WATCHES.contains(&l.title.as_str()), "{}", l.title);
            let price: u32 = l.price.parse().unwrap();
            assert!((100..5100).contains(&price));
        }
    }

    #[test]
    fn test_unmatched_term_is_templated() {
        let listings = generate_listings("xyzzy", 8, 1);
        assert_eq!(listings.len(), 8);
        assert!(listings.iter().all(|l| l.title.contains("xyzzy")));
        assert_eq!(listings[0].title, "Vintage xyzzy Collection");
    }

    #[test]
    fn test_generated_shape() {
        let listings = generate_listings("electronics", 8, 99);
        for (i, l) in listings.iter().enumerate() {
            assert!(l.is_well_formed(), "{l:?}");
            assert_eq!(l.id, format!("realistic-{i}-99"));
            assert_eq!(l.source.as_deref(), Some(SIMULATION_SOURCE));
            assert!(l.seller.as_deref().unwrap().starts_with("seller_"));

            let rating: f64 = l.rating.as_deref().unwrap().parse().unwrap();
            assert!((4.0..=5.0).contains(&rating));
            assert!(l.bids.unwrap() < 20);
        }
        assert_eq!(listings[0].shipping.as_deref(), Some("Free shipping"));
    }

    #[test]
    fn test_respects_max() {
        assert_eq!(generate_listings("shoes", 3, 1).len(), 3);
        assert!(generate_listings("shoes", 0, 1).is_empty());
    }
}
