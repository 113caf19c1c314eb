//! Watchlist and product-detection handling.
//!
//! Adding a product needs a logged-in session: the backend is told first,
//! and only a successful response appends the entry to the local store.
//! Entries are never edited once written.
//!
//! # Usage
//!
//! ```rust,ignore
//! let service = WatchlistService::new(store, backend);
//! service.add(&session, &product).await?;
//!
//! // later, on the next detection of the same page
//! for alert in service.on_product_detected(&product).await? {
//!     println!("{alert:?}");
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{PriceIntelError, Result};
use crate::session::{AuthStatus, Session};
use crate::traits::backend::{AddWatchlistRequest, BackendApi};
use crate::traits::store::{get_json, set_json, KeyValueStore, CURRENT_PRODUCT_KEY, WATCHLIST_KEY};
use crate::types::product::ProductRecord;

/// One watched product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub product: ProductRecord,

    pub added_at: DateTime<Utc>,

    /// 90% of the price when added, rounded
    pub target_price: u64,
}

impl WatchlistEntry {
    pub fn new(product: ProductRecord, added_at: DateTime<Utc>) -> Self {
        let target_price = target_price_for(product.price);
        Self {
            product,
            added_at,
            target_price,
        }
    }
}

/// `round(price * 0.9)` in integer arithmetic.
///
/// Computed in `u128`; the result never exceeds `price`, so it fits.
pub fn target_price_for(price: u64) -> u64 {
    ((u128::from(price) * 9 + 5) / 10) as u64
}

/// Raised when a detected product matches a watched one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceAlert {
    /// Price is at or below the entry's target.
    TargetReached {
        url: String,
        price: u64,
        target_price: u64,
    },

    /// Price fell more than 10% below the price when added.
    PriceDrop {
        url: String,
        price: u64,
        added_price: u64,
    },
}

/// Alerts for one watched entry against a fresh observation.
pub fn alerts_for(entry: &WatchlistEntry, product: &ProductRecord) -> Vec<PriceAlert> {
    let mut alerts = Vec::new();
    if entry.product.url != product.url || product.price == 0 {
        return alerts;
    }

    if product.price <= entry.target_price {
        alerts.push(PriceAlert::TargetReached {
            url: product.url.clone(),
            price: product.price,
            target_price: entry.target_price,
        });
    }
    // price < 0.9 * added
    if u128::from(product.price) * 10 < u128::from(entry.product.price) * 9 {
        alerts.push(PriceAlert::PriceDrop {
            url: product.url.clone(),
            price: product.price,
            added_price: entry.product.price,
        });
    }
    alerts
}

/// Watchlist operations over a key-value store and the backend.
pub struct WatchlistService<S, B> {
    store: Arc<S>,
    backend: Arc<B>,
    // read-modify-write of the watchlist key
    append_lock: Mutex<()>,
}

impl<S, B> WatchlistService<S, B>
where
    S: KeyValueStore,
    B: BackendApi,
{
    pub fn new(store: Arc<S>, backend: Arc<B>) -> Self {
        Self {
            store,
            backend,
            append_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// All watched entries, oldest first.
    pub async fn entries(&self) -> Result<Vec<WatchlistEntry>> {
        Ok(get_json(self.store.as_ref(), WATCHLIST_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Most recently detected product.
    pub async fn current_product(&self) -> Result<Option<ProductRecord>> {
        get_json(self.store.as_ref(), CURRENT_PRODUCT_KEY).await
    }

    /// Add a product to the watchlist.
    ///
    /// Fails with `AuthRequired` for an anonymous session and with `Backend`
    /// when the API refuses. Nothing is stored unless the API accepted it.
    pub async fn add(&self, session: &Session, product: &ProductRecord) -> Result<WatchlistEntry> {
        let token = match session.token() {
            Some(token) if session.is_authenticated() => token,
            _ => return Err(PriceIntelError::AuthRequired),
        };

        let request = AddWatchlistRequest::from(product);
        let response = self.backend.add_to_watchlist(token, &request).await?;
        if !response.success {
            let reason = response
                .error
                .unwrap_or_else(|| "watchlist add rejected".to_string());
            warn!(url = %product.url, error = %reason, "Backend refused watchlist add");
            return Err(PriceIntelError::Backend(reason));
        }

        let entry = WatchlistEntry::new(product.clone(), Utc::now());
        {
            let _guard = self.append_lock.lock().await;
            let mut entries = self.entries().await?;
            entries.push(entry.clone());
            set_json(self.store.as_ref(), WATCHLIST_KEY, &entries).await?;
        }

        info!(
            url = %product.url,
            name = %product.name,
            target_price = entry.target_price,
            "Added to watchlist"
        );
        Ok(entry)
    }

    /// Record a detection and check it against the watchlist.
    pub async fn on_product_detected(&self, product: &ProductRecord) -> Result<Vec<PriceAlert>> {
        set_json(self.store.as_ref(), CURRENT_PRODUCT_KEY, product).await?;

        let alerts: Vec<PriceAlert> = self
            .entries()
            .await?
            .iter()
            .flat_map(|entry| alerts_for(entry, product))
            .collect();

        if !alerts.is_empty() {
            info!(url = %product.url, price = product.price, count = alerts.len(), "Price alerts");
        }
        Ok(alerts)
    }

    /// Ask the backend who the session belongs to.
    ///
    /// Any failure reads as not authenticated.
    pub async fn check_auth(&self, session: &Session) -> AuthStatus {
        let Some(token) = session.token() else {
            return AuthStatus::anonymous();
        };

        match self.backend.current_user(token).await {
            Ok(Some(user)) => AuthStatus {
                authenticated: true,
                user: Some(user),
            },
            Ok(None) => AuthStatus::anonymous(),
            Err(e) => {
                debug!(error = %e, "Auth check failed");
                AuthStatus::anonymous()
            }
        }
    }
}
