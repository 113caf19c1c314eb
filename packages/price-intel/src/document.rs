//! Read-only access to rendered page markup.
//!
//! Adapters only ever see a [`Document`]: query-selector and text-content
//! access, nothing else. [`HtmlDocument`] implements it over the `scraper`
//! crate so pages can be parsed from saved or fetched HTML.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::observer::PageSnapshot;

/// A rendered page that can be queried with CSS selectors.
pub trait Document {
    /// URL of the page.
    fn url(&self) -> &str;

    /// Text content of the first element matching `css`.
    ///
    /// Returns `None` when nothing matches or the selector is invalid.
    fn select_text(&self, css: &str) -> Option<String>;

    /// Attribute value of the first element matching `css`.
    fn select_attr(&self, css: &str, attr: &str) -> Option<String>;
}

/// A parsed HTML page.
pub struct HtmlDocument {
    url: String,
    html: Html,
}

impl HtmlDocument {
    /// Parse a full HTML document.
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(html),
        }
    }

    /// Parse the markup captured in a page snapshot.
    pub fn from_snapshot(snapshot: &PageSnapshot) -> Self {
        Self::parse(snapshot.url.clone(), &snapshot.html)
    }

    fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = match Selector::parse(css) {
            Ok(s) => s,
            Err(e) => {
                debug!(selector = %css, error = %e, "Invalid selector");
                return None;
            }
        };
        self.html.select(&selector).next()
    }
}

impl Document for HtmlDocument {
    fn url(&self) -> &str {
        &self.url
    }

    fn select_text(&self, css: &str) -> Option<String> {
        self.first(css).map(|el| el.text().collect::<String>())
    }

    fn select_attr(&self, css: &str, attr: &str) -> Option<String> {
        self.first(css)
            .and_then(|el| el.value().attr(attr))
            .map(|v| v.to_string())
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument").field("url", &self.url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_text_joins_descendants() {
        let doc = HtmlDocument::parse(
            "https://example.com",
            r#"<html><body><h1 id="t">Hello <b>World</b></h1></body></html>"#,
        );
        assert_eq!(doc.select_text("#t").as_deref(), Some("Hello World"));
        assert_eq!(doc.url(), "https://example.com");
    }

    #[test]
    fn test_select_attr_reads_first_match() {
        let doc = HtmlDocument::parse(
            "u",
            r#"<img class="a" src="one.jpg"><img class="a" src="two.jpg">"#,
        );
        assert_eq!(doc.select_attr("img.a", "src").as_deref(), Some("one.jpg"));
        assert_eq!(doc.select_attr("img.a", "alt"), None);
    }

    #[test]
    fn test_invalid_selector_is_a_miss() {
        let doc = HtmlDocument::parse("u", "<p>x</p>");
        assert_eq!(doc.select_text("p[[["), None);
    }

    #[test]
    fn test_empty_document_matches_nothing() {
        let doc = HtmlDocument::parse("u", "");
        assert_eq!(doc.select_text("h1"), None);
    }
}
