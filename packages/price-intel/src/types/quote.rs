//! Quote types - one retailer's offer and aggregates over a search.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::forecast::ForecastSeries;

/// Stock availability shown on a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Only 2 left")]
    OnlyTwoLeft,
    #[serde(rename = "Limited Stock")]
    LimitedStock,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockStatus::InStock => "In Stock",
            StockStatus::OnlyTwoLeft => "Only 2 left",
            StockStatus::LimitedStock => "Limited Stock",
        };
        f.write_str(label)
    }
}

/// One retailer's synthetic offer for a query.
///
/// Generated fresh per search and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Retailer display name
    pub platform: String,

    /// Retailer icon
    pub platform_icon: String,

    /// Listing title built from the retailer's template
    pub title: String,

    /// Offer price
    pub price: u64,

    /// Pre-discount price, never below `price`
    pub original_price: u64,

    /// Discount in whole percent, 5..=39
    pub discount_percent: u32,

    /// Star rating, 3.0..=4.8 with one decimal
    pub rating: f64,

    /// Number of reviews
    pub reviews_count: u32,

    /// Availability
    pub stock_status: StockStatus,

    /// Delivery estimate such as "2-3 days"
    pub delivery: String,

    /// Seller name
    pub seller: String,

    /// Retailer search URL for the query
    pub url: String,

    /// Set on exactly one quote of a search: the cheapest
    pub is_best_price: bool,
}

/// Aggregate over the quotes of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub lowest_price: u64,
    pub highest_price: u64,
    /// Rounded mean price
    pub average_price: u64,
    pub stores_compared: usize,
    /// Highest original price minus lowest price
    pub max_savings: u64,
    /// Rounded mean discount percent
    pub average_discount: u32,
    pub best_platform: String,
}

/// Full result of one synthesized search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub quotes: Vec<Quote>,
    pub statistics: Statistics,
    pub forecast: ForecastSeries,
}

impl SearchResult {
    /// The quote flagged as best price.
    pub fn best_quote(&self) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.is_best_price)
    }
}
