//! Integration tests for the page-to-watchlist flow.
//!
//! These tests drive the public API the way a host would:
//! 1. Pick an adapter for the page URL
//! 2. Observe the page until a product is detected
//! 3. Record the detection and add it to the watchlist
//! 4. Follow a price change into a watchlist alert

use std::sync::Arc;
use std::time::Duration;

use price_intel::{
    testing::{demo_session, MockBackend, MockPage, AMAZON_PAGE, AMAZON_URL, FLIPKART_PAGE, FLIPKART_URL},
    AdapterRegistry, HtmlDocument, MemoryStore, ObserverConfig, PageEvent, PageObserver, Platform,
    PollOutcome, PriceAlert, PriceIntelError, WatchlistService,
};
use tokio::sync::mpsc;

fn amazon_with_price(price: &str) -> String {
    AMAZON_PAGE.replace("69,900<span", &format!("{price}<span"))
}

#[test]
fn test_registry_extracts_both_sites() {
    let registry = AdapterRegistry::default();

    let amazon = registry
        .extract(&HtmlDocument::parse(AMAZON_URL, AMAZON_PAGE))
        .unwrap();
    assert_eq!(amazon.platform, Platform::Amazon);
    assert_eq!(amazon.price, 69900);

    let flipkart = registry
        .extract(&HtmlDocument::parse(FLIPKART_URL, FLIPKART_PAGE))
        .unwrap();
    assert_eq!(flipkart.platform, Platform::Flipkart);
    assert_eq!(flipkart.price, 54999);
}

#[test]
fn test_platform_comes_from_adapter_not_content() {
    // Flipkart markup served under an Amazon URL is still an Amazon record.
    let registry = AdapterRegistry::default();
    let record = registry
        .extract(&HtmlDocument::parse(AMAZON_URL, FLIPKART_PAGE))
        .unwrap();

    assert_eq!(record.platform, Platform::Amazon);
    assert_eq!(record.name, "Samsung Galaxy S23 5G (Phantom Black, 128 GB)");
    assert_eq!(record.price, 0);
}

#[test]
fn test_unsupported_site_skips_pipeline() {
    let registry = AdapterRegistry::default();
    let page = Arc::new(MockPage::new("https://www.myntra.com/shoes", AMAZON_PAGE));

    let result = PageObserver::for_page(&registry, page.clone(), ObserverConfig::default());

    assert!(matches!(result, Err(PriceIntelError::UnsupportedSite { .. })));
    assert_eq!(page.snapshot_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_detection_to_watchlist_alert() {
    let page = Arc::new(MockPage::new(AMAZON_URL, "<div id=\"skeleton\"></div>"));
    let observer = Arc::new(
        PageObserver::for_page(
            &AdapterRegistry::default(),
            page.clone(),
            ObserverConfig::new().with_poll_interval_ms(500),
        )
        .unwrap(),
    );
    let service = WatchlistService::new(Arc::new(MemoryStore::new()), Arc::new(MockBackend::new()));
    let mut events = observer.subscribe();
    let (changes, rx) = mpsc::channel(4);

    let runner = {
        let observer = observer.clone();
        tokio::spawn(async move { observer.run(rx).await })
    };

    tokio::time::sleep(Duration::from_millis(1200)).await;
    page.set_html(AMAZON_PAGE);

    let detected = match events.recv().await.unwrap() {
        PageEvent::Detected(product) => product,
        other => panic!("expected detection, got {other:?}"),
    };
    assert_eq!(detected.price, 69900);
    assert!(service.on_product_detected(&detected).await.unwrap().is_empty());
    service.add(&demo_session(), &detected).await.unwrap();

    page.set_html(amazon_with_price("59,900"));
    changes.send(()).await.unwrap();

    let updated = match events.recv().await.unwrap() {
        PageEvent::PriceUpdated { previous, product } => {
            assert_eq!(previous, 69900);
            product
        }
        other => panic!("expected price update, got {other:?}"),
    };

    let alerts = service.on_product_detected(&updated).await.unwrap();
    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().any(|a| matches!(a, PriceAlert::TargetReached { target_price: 62910, .. })));
    assert!(alerts.iter().any(|a| matches!(a, PriceAlert::PriceDrop { added_price: 69900, .. })));
    assert_eq!(service.current_product().await.unwrap().unwrap().price, 59900);

    drop(changes);
    assert!(matches!(runner.await.unwrap(), PollOutcome::Detected(_)));
}

#[tokio::test(start_paused = true)]
async fn test_page_that_never_renders_times_out() {
    let page = Arc::new(MockPage::new(FLIPKART_URL, ""));
    let observer = PageObserver::for_page(
        &AdapterRegistry::default(),
        page.clone(),
        ObserverConfig::new().with_poll_interval_ms(250).with_max_wait_ms(2000),
    )
    .unwrap();
    let (_changes, rx) = mpsc::channel(1);

    assert_eq!(observer.run(rx).await, PollOutcome::TimedOut);
    assert_eq!(page.snapshot_count(), 8);
    assert_eq!(observer.current(), None);
}
