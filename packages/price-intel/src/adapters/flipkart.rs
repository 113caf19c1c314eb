//! Flipkart product pages.

use regex::Regex;
use std::sync::LazyLock;

use super::{Probe, ProbeChain, ProductSelectors, SiteAdapter};
use crate::types::product::Platform;

static RE_PRODUCT_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"flipkart\.com/[^/]+/p/").unwrap());

// Flipkart ships obfuscated class names that rotate between deploys, so each
// chain ends with a looser attribute match.
static SELECTORS: ProductSelectors = ProductSelectors {
    title: ProbeChain(&[
        Probe::text(".B_NuCI"),
        Probe::text("h1"),
        Probe::text(r#"span[class*="product-title"]"#),
    ]),
    price: ProbeChain(&[
        Probe::text("._30jeq3"),
        Probe::text(".dyC4hf"),
        Probe::text(r#"div[class*="price"]"#),
    ]),
    image: ProbeChain(&[
        Probe::attr("._396cs4", "src"),
        Probe::attr(r#"img[class*="product-image"]"#, "src"),
        Probe::attr(r#"img[src*="flipkart"]"#, "src"),
    ]),
};

/// Adapter for `flipkart.com/<slug>/p/<id>` pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipkartAdapter;

impl SiteAdapter for FlipkartAdapter {
    fn platform(&self) -> Platform {
        Platform::Flipkart
    }

    fn detect(&self, url: &str) -> bool {
        RE_PRODUCT_PAGE.is_match(url)
    }

    fn selectors(&self) -> &ProductSelectors {
        &SELECTORS
    }
}
