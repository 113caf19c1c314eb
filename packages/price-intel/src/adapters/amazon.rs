//! Amazon India product pages.

use regex::Regex;
use std::sync::LazyLock;

use super::{Probe, ProbeChain, ProductSelectors, SiteAdapter};
use crate::types::product::Platform;

static RE_PRODUCT_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"amazon\.in/(dp|gp/product)/").unwrap());

static SELECTORS: ProductSelectors = ProductSelectors {
    title: ProbeChain(&[
        Probe::text("#productTitle"),
        Probe::text("h1"),
        Probe::text(".a-size-large"),
    ]),
    price: ProbeChain(&[
        Probe::text(".a-price-whole"),
        Probe::text(".a-offscreen"),
        Probe::text(".priceBlockBuyingPriceString"),
    ]),
    image: ProbeChain(&[
        Probe::attr("#landingImage", "src"),
        Probe::attr("#imgBlkFront", "src"),
        Probe::attr(".a-dynamic-image", "src"),
    ]),
};

/// Adapter for `amazon.in/dp/...` and `amazon.in/gp/product/...` pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonAdapter;

impl SiteAdapter for AmazonAdapter {
    fn platform(&self) -> Platform {
        Platform::Amazon
    }

    fn detect(&self, url: &str) -> bool {
        RE_PRODUCT_PAGE.is_match(url)
    }

    fn selectors(&self) -> &ProductSelectors {
        &SELECTORS
    }
}
