//! Product-Page Extraction and Synthetic Price Comparison
//!
//! Turns e-commerce product pages into canonical product records, cleans
//! up spoken or typed queries, and produces a believable multi-retailer
//! price comparison with a 7-day outlook when no live pricing source exists.
//!
//! # Design
//!
//! - Per-site adapters with ordered selector fallbacks; extraction never fails
//! - A per-page-view observer that polls, detects once, then follows price changes
//! - Pure, seedable synthesis so results are reproducible in tests
//! - Persistence and the remote API are plugged in through traits
//!
//! # Usage
//!
//! ```rust,ignore
//! use price_intel::{normalize, QuoteSynthesizer, SynthesizerConfig};
//!
//! let query = normalize("search for iphone 15 please");
//! let synth = QuoteSynthesizer::new(SynthesizerConfig::default());
//! let result = synth.search(&query).await?;
//!
//! for quote in &result.quotes {
//!     println!("{:<18} ₹{}", quote.platform, quote.price);
//! }
//! println!("{}", result.forecast.recommendation);
//! ```
//!
//! # Modules
//!
//! - [`adapters`] - Site adapters and the adapter registry
//! - [`document`] - CSS-selector access to page markup
//! - [`normalize`] - Query cleanup
//! - [`observer`] - Page observation state machine
//! - [`synth`] - Quote, statistics and forecast synthesis
//! - [`traits`] - Store and backend seams
//! - [`stores`] - Store implementations (MemoryStore)
//! - [`backend`] - Backend implementations (HttpBackend)
//! - [`watchlist`] - Watchlist and price alerts
//! - [`testing`] - Fixtures and mock implementations for testing

pub mod adapters;
pub mod backend;
pub mod document;
pub mod error;
pub mod normalize;
pub mod observer;
pub mod session;
pub mod stores;
pub mod synth;
pub mod testing;
pub mod traits;
pub mod types;
pub mod watchlist;

// Re-export core types at crate root
pub use adapters::{AdapterRegistry, AmazonAdapter, Extraction, FlipkartAdapter, SiteAdapter};
pub use backend::HttpBackend;
pub use document::{Document, HtmlDocument};
pub use error::{PriceIntelError, Result};
pub use normalize::normalize;
pub use observer::{
    ObserverState, PageEvent, PageObserver, PageSnapshot, PageSource, PollOutcome,
};
pub use session::{AuthStatus, AuthToken, Session, User};
pub use stores::MemoryStore;
pub use synth::{
    generate_quotes, synthesize, trending, Category, PriceRangeBucket, QuoteSynthesizer,
    RetailerProfile, TrendingQuery, RETAILERS,
};
pub use traits::{
    backend::{AddWatchlistRequest, ApiResponse, BackendApi},
    store::KeyValueStore,
};
pub use types::{
    config::{BackendConfig, ObserverConfig, SynthesizerConfig},
    forecast::{BestTimeToBuy, ForecastPoint, ForecastSeries, Trend},
    product::{Field, Platform, ProductRecord},
    quote::{Quote, SearchResult, Statistics, StockStatus},
};
pub use watchlist::{PriceAlert, WatchlistEntry, WatchlistService};
