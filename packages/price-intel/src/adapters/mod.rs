//! Per-site extraction adapters.
//!
//! Each adapter owns a URL pattern and an ordered fallback chain of
//! selectors for every product field. Chains are tried most-specific-first;
//! the first probe that yields a non-empty value wins. A field with no
//! matching probe keeps its zero value (`""` or `0`), so extraction never
//! fails. It degrades to a partial or empty record instead.
//!
//! Adapters hold no per-page state and can be re-run on the same document
//! as often as the page observer needs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use price_intel::{AdapterRegistry, HtmlDocument};
//!
//! let registry = AdapterRegistry::default();
//! let doc = HtmlDocument::parse(url, &html);
//! let product = registry.extract(&doc)?; // UnsupportedSite if no adapter matches
//! ```

mod amazon;
mod flipkart;

pub use amazon::AmazonAdapter;
pub use flipkart::FlipkartAdapter;

use std::sync::Arc;
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{PriceIntelError, Result};
use crate::types::product::{Field, Platform, ProductRecord, MAX_NAME_CHARS};

/// How a probe reads a value from its matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// Text content
    Text,
    /// Named attribute
    Attr(&'static str),
}

/// One selector in a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub css: &'static str,
    pub read: Read,
}

impl Probe {
    pub const fn text(css: &'static str) -> Self {
        Self {
            css,
            read: Read::Text,
        }
    }

    pub const fn attr(css: &'static str, attr: &'static str) -> Self {
        Self {
            css,
            read: Read::Attr(attr),
        }
    }

    /// Raw value of the first element this probe matches, if non-blank.
    pub fn read(&self, doc: &dyn Document) -> Option<String> {
        let raw = match self.read {
            Read::Text => doc.select_text(self.css),
            Read::Attr(attr) => doc.select_attr(self.css, attr),
        }?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Ordered selectors for one field, most specific first.
#[derive(Debug, Clone, Copy)]
pub struct ProbeChain(pub &'static [Probe]);

impl ProbeChain {
    /// First probe whose value survives `parse`.
    pub fn first_with<T>(
        &self,
        doc: &dyn Document,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        self.0.iter().find_map(|probe| {
            let value = probe.read(doc)?;
            let parsed = parse(&value);
            if parsed.is_none() {
                debug!(selector = probe.css, "Probe matched but value was unusable");
            }
            parsed
        })
    }

    /// First non-empty raw value.
    pub fn first(&self, doc: &dyn Document) -> Option<String> {
        self.first_with(doc, |v| Some(v.to_string()))
    }
}

/// Fallback chains for every field of a product record.
#[derive(Debug, Clone, Copy)]
pub struct ProductSelectors {
    pub title: ProbeChain,
    pub price: ProbeChain,
    pub image: ProbeChain,
}

/// Outcome of one extraction: the record plus the fields nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: ProductRecord,
    pub misses: Vec<Field>,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        self.misses.is_empty()
    }
}

/// Strategy that turns one site's product page into a [`ProductRecord`].
pub trait SiteAdapter: Send + Sync {
    /// Identity stamped on every record this adapter produces.
    fn platform(&self) -> Platform;

    /// Whether `url` is a product page this adapter understands.
    fn detect(&self, url: &str) -> bool;

    /// Selector chains for this site.
    fn selectors(&self) -> &ProductSelectors;

    /// Extract a record and report which fields missed.
    fn extract_detailed(&self, doc: &dyn Document) -> Extraction {
        let selectors = self.selectors();
        let mut record = ProductRecord::empty(self.platform(), doc.url());
        let mut misses = Vec::new();

        match selectors.title.first(doc) {
            Some(title) => record.name = clean_title(&title),
            None => misses.push(Field::Title),
        }
        match selectors.price.first_with(doc, parse_price) {
            Some(price) => record.price = price,
            None => misses.push(Field::Price),
        }
        match selectors.image.first(doc) {
            Some(image) => record.image = image,
            None => misses.push(Field::Image),
        }

        for &field in &misses {
            let miss = PriceIntelError::ExtractionMiss { field };
            debug!(
                platform = %self.platform(),
                url = %doc.url(),
                error = %miss,
                "Soft extraction failure"
            );
        }

        Extraction { record, misses }
    }

    /// Extract a record. Missing fields stay at their zero value.
    fn extract(&self, doc: &dyn Document) -> ProductRecord {
        self.extract_detailed(doc).record
    }
}

/// Collapse whitespace and truncate to [`MAX_NAME_CHARS`] characters.
pub fn clean_title(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_NAME_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Strip every non-digit and parse what remains.
///
/// Returns `None` when no digits are left or the number overflows.
pub fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    match digits.parse::<u64>() {
        Ok(price) => Some(price),
        Err(e) => {
            warn!(text = %text, error = %e, "Price out of range");
            None
        }
    }
}

/// Registry of site adapters, checked in registration order.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SiteAdapter>>,
}

impl Default for AdapterRegistry {
    /// Registry with every built-in adapter.
    fn default() -> Self {
        Self::new()
            .with_adapter(AmazonAdapter)
            .with_adapter(FlipkartAdapter)
    }
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Register an adapter (builder pattern).
    pub fn with_adapter(mut self, adapter: impl SiteAdapter + 'static) -> Self {
        self.adapters.push(Arc::new(adapter));
        self
    }

    /// All registered adapters.
    pub fn adapters(&self) -> &[Arc<dyn SiteAdapter>] {
        &self.adapters
    }

    /// Adapter for a URL, if any site pattern matches.
    pub fn find(&self, url: &str) -> Option<Arc<dyn SiteAdapter>> {
        self.adapters.iter().find(|a| a.detect(url)).cloned()
    }

    /// Whether any adapter supports this URL.
    pub fn is_supported(&self, url: &str) -> bool {
        self.find(url).is_some()
    }

    /// Adapter for a URL, or `UnsupportedSite`.
    pub fn require(&self, url: &str) -> Result<Arc<dyn SiteAdapter>> {
        self.find(url).ok_or_else(|| PriceIntelError::UnsupportedSite {
            url: url.to_string(),
        })
    }

    /// Extract from a document using the adapter matching its URL.
    pub fn extract(&self, doc: &dyn Document) -> Result<ProductRecord> {
        Ok(self.require(doc.url())?.extract(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;
    use crate::testing::{AMAZON_URL, FLIPKART_URL};

    #[test]
    fn test_parse_price_strips_currency_and_separators() {
        assert_eq!(parse_price("₹1,29,900"), Some(129900));
        assert_eq!(parse_price(" 54,999. "), Some(54999));
        assert_eq!(parse_price("Price unavailable"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn test_parse_price_overflow_is_a_miss() {
        assert_eq!(parse_price("99999999999999999999999"), None);
    }

    #[test]
    fn test_clean_title_truncates_to_150_chars() {
        let long = "é".repeat(200);
        let cleaned = clean_title(&long);
        assert_eq!(cleaned.chars().count(), 150);
        assert_eq!(clean_title("  Apple\n   iPhone  15 "), "Apple iPhone 15");
    }

    #[test]
    fn test_registry_detects_exactly_one_adapter() {
        let registry = AdapterRegistry::default();
        for url in [AMAZON_URL, FLIPKART_URL] {
            let matching = registry
                .adapters()
                .iter()
                .filter(|a| a.detect(url))
                .count();
            assert_eq!(matching, 1, "{url}");
        }
    }

    #[test]
    fn test_registry_rejects_unsupported_site() {
        let registry = AdapterRegistry::default();
        let doc = HtmlDocument::parse("https://example.com/item/1", "<h1>Thing</h1>");
        match registry.extract(&doc) {
            Err(PriceIntelError::UnsupportedSite { url }) => {
                assert_eq!(url, "https://example.com/item/1")
            }
            other => panic!("expected UnsupportedSite, got {other:?}"),
        }
        assert!(!registry.is_supported("https://www.amazon.in/s?k=phone"));
    }

    #[test]
    fn test_empty_document_yields_zero_record() {
        let registry = AdapterRegistry::default();
        let doc = HtmlDocument::parse(AMAZON_URL, "");
        let adapter = registry.require(AMAZON_URL).unwrap();
        let extraction = adapter.extract_detailed(&doc);

        assert_eq!(extraction.record.name, "");
        assert_eq!(extraction.record.price, 0);
        assert_eq!(extraction.record.image, "");
        assert_eq!(extraction.record.platform, Platform::Amazon);
        assert_eq!(extraction.record.url, AMAZON_URL);
        assert_eq!(extraction.misses, vec![Field::Title, Field::Price, Field::Image]);
    }

    #[test]
    fn test_price_probe_without_digits_falls_through() {
        let doc = HtmlDocument::parse(
            AMAZON_URL,
            r#"<span class="a-price-whole">Currently unavailable</span>
               <span class="a-offscreen">₹2,499</span>"#,
        );
        let record = AmazonAdapter.extract(&doc);
        assert_eq!(record.price, 2499);
    }
}
