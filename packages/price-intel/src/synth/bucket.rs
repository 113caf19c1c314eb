//! Keyword classification of a query into a price range.

use serde::{Deserialize, Serialize};

/// Price range a query's quotes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeBucket {
    pub min: u64,
    pub max: u64,
}

impl PriceRangeBucket {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Random headroom added on top of a retailer's base price:
    /// 15% of the range width, rounded down.
    pub fn variance(&self) -> u64 {
        self.max.saturating_sub(self.min) * 15 / 100
    }
}

/// Product category inferred from query keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Phones,
    Laptops,
    Audio,
    Shoes,
    Watches,
    Televisions,
    General,
}

/// Categories in priority order: the first one with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Phones, &["iphone", "samsung galaxy", "pixel"]),
    (Category::Laptops, &["macbook", "laptop"]),
    (Category::Audio, &["airpods", "headphone", "earbud"]),
    (Category::Shoes, &["nike", "shoe", "sneaker"]),
    (Category::Watches, &["watch", "smartwatch"]),
    (Category::Televisions, &["tv", "television"]),
];

impl Category {
    /// Classify a query by lower-cased substring match.
    pub fn classify(query: &str) -> Self {
        let query_lower = query.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| query_lower.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::General)
    }

    /// Fixed price range for this category.
    pub fn bucket(&self) -> PriceRangeBucket {
        match self {
            Category::Phones => PriceRangeBucket::new(45_000, 120_000),
            Category::Laptops => PriceRangeBucket::new(60_000, 200_000),
            Category::Audio => PriceRangeBucket::new(2_000, 25_000),
            Category::Shoes => PriceRangeBucket::new(1_500, 12_000),
            Category::Watches => PriceRangeBucket::new(3_000, 45_000),
            Category::Televisions => PriceRangeBucket::new(15_000, 120_000),
            Category::General => PriceRangeBucket::new(1_000, 50_000),
        }
    }
}

/// Price range for a query.
pub fn bucket_for(query: &str) -> PriceRangeBucket {
    Category::classify(query).bucket()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_keyword() {
        assert_eq!(Category::classify("iPhone 15"), Category::Phones);
        assert_eq!(Category::classify("Samsung Galaxy S23"), Category::Phones);
        assert_eq!(Category::classify("gaming laptop"), Category::Laptops);
        assert_eq!(Category::classify("AirPods Pro"), Category::Audio);
        assert_eq!(Category::classify("running shoes"), Category::Shoes);
        assert_eq!(Category::classify("Garmin smartwatch"), Category::Watches);
        assert_eq!(Category::classify("55 inch Television"), Category::Televisions);
        assert_eq!(Category::classify("coffee grinder"), Category::General);
    }

    #[test]
    fn test_first_category_in_priority_order_wins() {
        // Matches phones and watches; phones come first.
        assert_eq!(Category::classify("iphone watch strap"), Category::Phones);
        // Matches audio and shoes; audio comes first.
        assert_eq!(Category::classify("nike headphones"), Category::Audio);
    }

    #[test]
    fn test_samsung_alone_is_not_a_phone() {
        assert_eq!(Category::classify("samsung fridge"), Category::General);
    }

    #[test]
    fn test_bucket_bounds_and_variance() {
        let phones = bucket_for("iphone 15");
        assert_eq!(phones, PriceRangeBucket::new(45_000, 120_000));
        assert_eq!(phones.variance(), 11_250);
        assert_eq!(bucket_for("anything").variance(), 7_350);
        assert_eq!(PriceRangeBucket::new(10, 10).variance(), 0);
    }
}
