//! Synthetic multi-retailer price comparison.
//!
//! There is no live pricing source. A query is classified into a price
//! bucket, each registered retailer gets one quote drawn from that bucket,
//! and statistics plus a 7-day forecast are derived from the quotes.
//!
//! The generators take an injected [`Rng`], so a seeded
//! [`rand_chacha::ChaCha8Rng`] gives reproducible results.
//!
//! # Usage
//!
//! ```rust,ignore
//! use price_intel::{QuoteSynthesizer, SynthesizerConfig};
//!
//! let synth = QuoteSynthesizer::new(SynthesizerConfig::default().with_seed(42));
//! let result = synth.search("iPhone 15").await?;
//! println!("{} is cheapest", result.statistics.best_platform);
//! ```

pub mod bucket;
pub mod forecast;
pub mod retailers;
pub mod stats;
pub mod trending;

pub use bucket::{bucket_for, Category, PriceRangeBucket};
pub use forecast::forecast;
pub use retailers::{retailer, RetailerProfile, RETAILERS};
pub use trending::{trending, TrendingQuery};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{PriceIntelError, Result};
use crate::types::config::SynthesizerConfig;
use crate::types::quote::{Quote, SearchResult, Statistics, StockStatus};

const REVIEW_COUNTS: &[u32] = &[125, 342, 567, 892, 1245, 2345, 4567, 7890, 12345];

const DELIVERY_ESTIMATES: &[&str] = &[
    "1-2 days",
    "2-3 days",
    "3-4 days",
    "4-5 days",
    "5-7 days",
    "7-10 days",
];

/// Three in five quotes are in stock.
const STOCK_STATUSES: &[StockStatus] = &[
    StockStatus::InStock,
    StockStatus::InStock,
    StockStatus::InStock,
    StockStatus::OnlyTwoLeft,
    StockStatus::LimitedStock,
];

fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> &'a T {
    // Every pool above is a non-empty literal.
    items.choose(rng).unwrap_or(&items[0])
}

fn quote_for<R: Rng + ?Sized>(
    profile: &RetailerProfile,
    bucket: PriceRangeBucket,
    query: &str,
    rng: &mut R,
) -> Quote {
    let base_price = bucket.min + profile.base_price_offset;
    let variance = bucket.variance();
    let price = if variance == 0 {
        base_price
    } else {
        base_price + rng.gen_range(0..variance)
    };

    let discount_percent: u32 = rng.gen_range(5..=39);
    let original_price = (price * (100 + u64::from(discount_percent)) + 50) / 100;
    let rating = (rng.gen_range(3.0..=4.8_f64) * 10.0).round() / 10.0;

    Quote {
        platform: profile.name.to_string(),
        platform_icon: profile.icon.to_string(),
        title: profile.title(query),
        price,
        original_price,
        discount_percent,
        rating,
        reviews_count: *pick(REVIEW_COUNTS, rng),
        stock_status: *pick(STOCK_STATUSES, rng),
        delivery: pick(DELIVERY_ESTIMATES, rng).to_string(),
        seller: profile.seller.to_string(),
        url: profile.search_url(query),
        is_best_price: false,
    }
}

/// One quote per retailer, sorted by price with the cheapest flagged.
///
/// The sort is stable, so equal prices keep retailer registry order and
/// the first of them gets the flag.
pub fn generate_quotes<R: Rng + ?Sized>(query: &str, rng: &mut R) -> Vec<Quote> {
    let bucket = bucket_for(query);
    let mut quotes: Vec<Quote> = RETAILERS
        .iter()
        .map(|profile| quote_for(profile, bucket, query, rng))
        .collect();

    quotes.sort_by_key(|q| q.price);
    if let Some(best) = quotes.first_mut() {
        best.is_best_price = true;
    }
    quotes
}

/// Full comparison for a query: quotes, statistics and forecast.
///
/// Total over any query. Length checks belong to the caller
/// (see [`QuoteSynthesizer::validate`]).
pub fn synthesize<R: Rng + ?Sized>(query: &str, rng: &mut R) -> SearchResult {
    let quotes = generate_quotes(query, rng);
    let statistics = Statistics::from_quotes(&quotes).unwrap_or_else(|| Statistics {
        lowest_price: 0,
        highest_price: 0,
        average_price: 0,
        stores_compared: 0,
        max_savings: 0,
        average_discount: 0,
        best_platform: String::new(),
    });
    let forecast = forecast::forecast(statistics.lowest_price, rng);

    SearchResult {
        query: query.to_string(),
        quotes,
        statistics,
        forecast,
    }
}

/// Search façade: validates the query, waits out the configured latency
/// and synthesizes from its own random source.
pub struct QuoteSynthesizer {
    config: SynthesizerConfig,
    rng: Mutex<ChaCha8Rng>,
}

impl QuoteSynthesizer {
    pub fn new(config: SynthesizerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Trim a query and reject it if it is too short.
    pub fn validate<'a>(&self, query: &'a str) -> Result<&'a str> {
        let trimmed = query.trim();
        let chars = trimmed.chars().count();
        if chars < self.config.min_query_chars {
            return Err(PriceIntelError::InputRejected {
                reason: format!(
                    "query must be at least {} characters, got {}",
                    self.config.min_query_chars, chars
                ),
            });
        }
        Ok(trimmed)
    }

    /// Validate, wait out the configured latency, then synthesize.
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let query = self.validate(query)?;
        debug!(query = %query, latency_ms = self.config.latency_ms, "Synthesizing quotes");

        tokio::time::sleep(self.config.latency()).await;

        let result = {
            let mut rng = self.rng.lock().await;
            synthesize(query, &mut *rng)
        };

        info!(
            query = %query,
            stores = result.statistics.stores_compared,
            lowest_price = result.statistics.lowest_price,
            best_platform = %result.statistics.best_platform,
            "Search complete"
        );
        Ok(result)
    }
}
