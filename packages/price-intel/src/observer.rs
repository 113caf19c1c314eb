//! Per-page-view observation state machine.
//!
//! ```text
//! Idle ──start──▶ Polling ──complete record──▶ Detected ──▶ Observing
//!   ▲                │                                        │  ▲
//!   └────timeout─────┘                              page change │
//!                                                        └──────┘
//! ```
//!
//! Polling re-runs extraction on a fixed interval until a record with a
//! name and a positive price appears, or gives up after the configured
//! bound. Detection is published once; after that every page change
//! re-extracts and publishes a [`PageEvent::PriceUpdated`] when the price
//! moved. An observer never goes back to polling once it is observing.
//! A timeout is terminal too: the observer stays idle for the rest of the
//! page view and later calls to [`PageObserver::start`] report
//! [`PollOutcome::TimedOut`] without polling.
//!
//! The hosting environment owns change detection and calls
//! [`PageObserver::on_page_changed`] (or feeds [`PageObserver::run`]).
//! Extractions never overlap. A change that arrives while an earlier one
//! is still waiting for its turn supersedes it.
//!
//! # Usage
//!
//! ```rust,ignore
//! let observer = PageObserver::for_page(&registry, page, ObserverConfig::default())?;
//! let mut events = observer.subscribe();
//!
//! tokio::spawn(async move { observer.run(changes_rx).await });
//! while let Ok(event) = events.recv().await {
//!     println!("{}", event.product().price);
//! }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::adapters::{AdapterRegistry, SiteAdapter};
use crate::document::HtmlDocument;
use crate::error::{PriceIntelError, Result};
use crate::types::config::ObserverConfig;
use crate::types::product::ProductRecord;

const EVENT_CAPACITY: usize = 16;

/// Markup of a page at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Live page the observer reads from.
pub trait PageSource: Send + Sync {
    /// URL of the page view.
    fn url(&self) -> String;

    /// Current rendered markup.
    fn snapshot(&self) -> PageSnapshot;
}

/// Observer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverState {
    Idle,
    Polling,
    Detected,
    Observing,
}

impl fmt::Display for ObserverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObserverState::Idle => "idle",
            ObserverState::Polling => "polling",
            ObserverState::Detected => "detected",
            ObserverState::Observing => "observing",
        };
        f.write_str(name)
    }
}

/// Published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PageEvent {
    /// First complete record of this page view. Sent once.
    Detected(Arc<ProductRecord>),

    /// The observed price changed.
    PriceUpdated {
        previous: u64,
        product: Arc<ProductRecord>,
    },
}

impl PageEvent {
    pub fn product(&self) -> &Arc<ProductRecord> {
        match self {
            PageEvent::Detected(product) => product,
            PageEvent::PriceUpdated { product, .. } => product,
        }
    }
}

/// How a call to [`PageObserver::start`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Detected(Arc<ProductRecord>),
    TimedOut,
    /// The observer was not idle, so no polling happened.
    AlreadyStarted,
}

/// State machine for one page view.
pub struct PageObserver {
    config: ObserverConfig,
    adapter: Arc<dyn SiteAdapter>,
    source: Arc<dyn PageSource>,
    state: Mutex<ObserverState>,
    current: watch::Sender<Option<Arc<ProductRecord>>>,
    events: broadcast::Sender<PageEvent>,
    generation: AtomicU64,
    extract_lock: tokio::sync::Mutex<()>,
    // set under the state lock when polling gives up
    expired: AtomicBool,
}

impl PageObserver {
    /// Create an observer that extracts with a specific adapter.
    pub fn new(
        adapter: Arc<dyn SiteAdapter>,
        source: Arc<dyn PageSource>,
        config: ObserverConfig,
    ) -> Self {
        let (current, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            adapter,
            source,
            state: Mutex::new(ObserverState::Idle),
            current,
            events,
            generation: AtomicU64::new(0),
            extract_lock: tokio::sync::Mutex::new(()),
            expired: AtomicBool::new(false),
        }
    }

    /// Create an observer for a page, picking the adapter from its URL.
    pub fn for_page(
        registry: &AdapterRegistry,
        source: Arc<dyn PageSource>,
        config: ObserverConfig,
    ) -> Result<Self> {
        let adapter = registry.require(&source.url())?;
        Ok(Self::new(adapter, source, config))
    }

    pub fn state(&self) -> ObserverState {
        *self.lock_state()
    }

    /// Latest published product, if any.
    pub fn current(&self) -> Option<Arc<ProductRecord>> {
        self.current.borrow().clone()
    }

    /// Receiver that sees every replacement of the current product.
    pub fn watch_current(&self) -> watch::Receiver<Option<Arc<ProductRecord>>> {
        self.current.subscribe()
    }

    /// Subscribe to detection and price events.
    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.events.subscribe()
    }

    /// Poll for a product. Only acts when the observer is idle and has not
    /// timed out before.
    ///
    /// The first attempt runs one interval after the call, then one per
    /// interval, for `max_wait / poll_interval` attempts in total.
    pub async fn start(&self) -> PollOutcome {
        {
            let mut state = self.lock_state();
            if self.expired.load(Ordering::SeqCst) {
                debug!("Polling already timed out for this page view");
                return PollOutcome::TimedOut;
            }
            if *state != ObserverState::Idle {
                debug!(state = %*state, "Observer already started");
                return PollOutcome::AlreadyStarted;
            }
            *state = ObserverState::Polling;
        }

        let period = self.config.poll_interval();
        let attempts = self.config.max_attempts();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            url = %self.source.url(),
            platform = %self.adapter.platform(),
            attempts,
            "Polling for product"
        );

        for attempt in 1..=attempts {
            ticker.tick().await;
            let record = self.extract().await;
            if record.is_complete() {
                return PollOutcome::Detected(self.publish_detection(record));
            }
            debug!(attempt, "Product not rendered yet");
        }

        {
            let mut state = self.lock_state();
            self.expired.store(true, Ordering::SeqCst);
            *state = ObserverState::Idle;
        }
        let timeout = PriceIntelError::PollTimeout {
            waited: self.config.max_wait(),
        };
        info!(url = %self.source.url(), error = %timeout, "Stopped polling");
        PollOutcome::TimedOut
    }

    /// Re-extract after a page mutation.
    ///
    /// Ignored unless the observer is observing. Returns the event sent, if
    /// the price changed.
    pub async fn on_page_changed(&self) -> Option<PageEvent> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = self.extract_lock.lock().await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "Superseded by a newer page change");
            return None;
        }
        if self.state() != ObserverState::Observing {
            return None;
        }

        let record = self.extract_now();
        if !record.is_complete() {
            debug!(url = %record.url, "Page changed but product is incomplete");
            return None;
        }

        let previous = self.current.borrow().as_ref().map(|p| p.price)?;
        if previous == record.price {
            return None;
        }

        let product = Arc::new(record);
        info!(
            url = %product.url,
            previous,
            price = product.price,
            "Price changed"
        );
        self.current.send_replace(Some(product.clone()));
        let event = PageEvent::PriceUpdated { previous, product };
        let _ = self.events.send(event.clone());
        Some(event)
    }

    /// Poll, then re-extract on every change notification until the sender
    /// is dropped.
    ///
    /// Notifications that queue up during an extraction collapse into one.
    pub async fn run(&self, mut changes: mpsc::Receiver<()>) -> PollOutcome {
        let outcome = self.start().await;
        if !matches!(outcome, PollOutcome::Detected(_)) {
            return outcome;
        }

        while changes.recv().await.is_some() {
            while changes.try_recv().is_ok() {}
            self.on_page_changed().await;
        }
        outcome
    }

    fn publish_detection(&self, record: ProductRecord) -> Arc<ProductRecord> {
        let product = Arc::new(record);
        let mut state = self.lock_state();
        *state = ObserverState::Detected;

        info!(
            url = %product.url,
            platform = %product.platform,
            name = %product.name,
            price = product.price,
            "Product detected"
        );
        self.current.send_replace(Some(product.clone()));
        let _ = self.events.send(PageEvent::Detected(product.clone()));

        *state = ObserverState::Observing;
        product
    }

    async fn extract(&self) -> ProductRecord {
        let _guard = self.extract_lock.lock().await;
        self.extract_now()
    }

    // Parsed markup stays inside this call, so it never crosses an await.
    fn extract_now(&self) -> ProductRecord {
        let snapshot = self.source.snapshot();
        let doc = HtmlDocument::from_snapshot(&snapshot);
        self.adapter.extract(&doc)
    }

    fn lock_state(&self) -> MutexGuard<'_, ObserverState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for PageObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageObserver")
            .field("platform", &self.adapter.platform())
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockPage, AMAZON_PAGE, AMAZON_URL};
    use std::time::Duration;

    fn observer(page: &Arc<MockPage>) -> PageObserver {
        PageObserver::for_page(
            &AdapterRegistry::default(),
            page.clone(),
            ObserverConfig::default(),
        )
        .unwrap()
    }

    fn priced(price: &str) -> String {
        format!(r#"<span id="productTitle">Apple iPhone 15</span><span class="a-price-whole">{price}</span>"#)
    }

    #[test]
    fn test_unsupported_page_is_rejected() {
        let page = Arc::new(MockPage::new("https://example.com/item", ""));
        let result = PageObserver::for_page(
            &AdapterRegistry::default(),
            page,
            ObserverConfig::default(),
        );
        assert!(matches!(result, Err(PriceIntelError::UnsupportedSite { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detects_product_once_rendered() {
        let page = Arc::new(MockPage::new(AMAZON_URL, "<div>loading</div>"));
        let observer = observer(&page);
        let mut events = observer.subscribe();

        let render = {
            let page = page.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(2500)).await;
                page.set_html(AMAZON_PAGE);
            })
        };

        let started = Instant::now();
        let outcome = observer.start().await;
        render.await.unwrap();

        let product = match outcome {
            PollOutcome::Detected(product) => product,
            other => panic!("expected detection, got {other:?}"),
        };
        assert_eq!(product.price, 69900);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(page.snapshot_count(), 3);
        assert_eq!(observer.state(), ObserverState::Observing);
        assert_eq!(observer.current(), Some(product.clone()));
        assert_eq!(events.recv().await.unwrap(), PageEvent::Detected(product));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_back_to_idle() {
        let page = Arc::new(MockPage::new(AMAZON_URL, ""));
        let observer = observer(&page);

        let started = Instant::now();
        assert_eq!(observer.start().await, PollOutcome::TimedOut);

        assert_eq!(started.elapsed(), Duration::from_secs(10));
        assert_eq!(page.snapshot_count(), 10);
        assert_eq!(observer.state(), ObserverState::Idle);
        assert_eq!(observer.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_terminal() {
        let page = Arc::new(MockPage::new(AMAZON_URL, ""));
        let observer = observer(&page);
        assert_eq!(observer.start().await, PollOutcome::TimedOut);

        // Even a page that renders later is not picked up again.
        page.set_html(AMAZON_PAGE);
        let restarted = Instant::now();
        assert_eq!(observer.start().await, PollOutcome::TimedOut);

        assert_eq!(restarted.elapsed(), Duration::ZERO);
        assert_eq!(page.snapshot_count(), 10);
        assert_eq!(observer.state(), ObserverState::Idle);
        assert_eq!(observer.on_page_changed().await, None);
        assert_eq!(observer.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_start_detects_once() {
        let page = Arc::new(MockPage::new(AMAZON_URL, AMAZON_PAGE));
        let observer = observer(&page);
        let mut events = observer.subscribe();

        let (a, b) = tokio::join!(observer.start(), observer.start());

        let detections = [&a, &b]
            .iter()
            .filter(|o| matches!(o, PollOutcome::Detected(_)))
            .count();
        assert_eq!(detections, 1);
        assert!([&a, &b].contains(&&PollOutcome::AlreadyStarted));
        assert!(matches!(events.recv().await, Ok(PageEvent::Detected(_))));
        assert!(events.try_recv().is_err());

        // Observing never goes back to polling.
        assert_eq!(observer.start().await, PollOutcome::AlreadyStarted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_price_change_emits_update() {
        let page = Arc::new(MockPage::new(AMAZON_URL, priced("69,900")));
        let observer = observer(&page);
        observer.start().await;
        let mut events = observer.subscribe();

        // Same price: nothing.
        assert_eq!(observer.on_page_changed().await, None);

        page.set_html(priced("64,900"));
        let event = observer.on_page_changed().await.unwrap();
        match &event {
            PageEvent::PriceUpdated { previous, product } => {
                assert_eq!(*previous, 69900);
                assert_eq!(product.price, 64900);
            }
            other => panic!("expected price update, got {other:?}"),
        }
        assert_eq!(events.recv().await.unwrap(), event);
        assert_eq!(observer.current().unwrap().price, 64900);
        assert_eq!(observer.state(), ObserverState::Observing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_page_after_detection_is_ignored() {
        let page = Arc::new(MockPage::new(AMAZON_URL, AMAZON_PAGE));
        let observer = observer(&page);
        observer.start().await;

        page.set_html("<div>re-rendering</div>");
        assert_eq!(observer.on_page_changed().await, None);
        assert_eq!(observer.current().unwrap().price, 69900);
        assert_eq!(observer.state(), ObserverState::Observing);
    }

    #[tokio::test]
    async fn test_changes_before_detection_are_ignored() {
        let page = Arc::new(MockPage::new(AMAZON_URL, AMAZON_PAGE));
        let observer = observer(&page);

        assert_eq!(observer.on_page_changed().await, None);
        assert_eq!(page.snapshot_count(), 0);
        assert_eq!(observer.state(), ObserverState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_changes_coalesce_to_latest() {
        let page = Arc::new(MockPage::new(AMAZON_URL, priced("100")));
        let observer = observer(&page);
        observer.start().await;
        let before = page.snapshot_count();

        let guard = observer.extract_lock.lock().await;
        page.set_html(priced("90"));
        let (first, second, third, ()) = tokio::join!(
            observer.on_page_changed(),
            observer.on_page_changed(),
            observer.on_page_changed(),
            async move {
                tokio::task::yield_now().await;
                drop(guard);
            }
        );

        assert_eq!(first, None);
        assert_eq!(second, None);
        assert!(matches!(third, Some(PageEvent::PriceUpdated { previous: 100, .. })));
        assert_eq!(page.snapshot_count(), before + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_drives_polling_then_changes() {
        let page = Arc::new(MockPage::new(AMAZON_URL, priced("500")));
        let observer = Arc::new(observer(&page));
        let mut current = observer.watch_current();
        let (tx, rx) = mpsc::channel(8);

        let runner = {
            let observer = observer.clone();
            tokio::spawn(async move { observer.run(rx).await })
        };

        current.changed().await.unwrap();
        assert_eq!(current.borrow_and_update().as_ref().unwrap().price, 500);

        page.set_html(priced("450"));
        tx.send(()).await.unwrap();
        current.changed().await.unwrap();
        assert_eq!(current.borrow_and_update().as_ref().unwrap().price, 450);

        drop(tx);
        assert!(matches!(runner.await.unwrap(), PollOutcome::Detected(_)));
    }
}
