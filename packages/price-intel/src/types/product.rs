//! Product types - the canonical record an adapter produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a product name, in characters.
pub const MAX_NAME_CHARS: usize = 150;

/// Site a product record was extracted from.
///
/// The platform is the identity of the adapter that produced the record,
/// never inferred from page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Platform {
    Amazon,
    Flipkart,
    #[default]
    Unknown,
}

impl Platform {
    /// Display name used in payloads and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Amazon => "Amazon",
            Platform::Flipkart => "Flipkart",
            Platform::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field of a product record filled by a selector chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Price,
    Image,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Price => "price",
            Field::Image => "image",
        };
        f.write_str(name)
    }
}

/// Canonical product observed on a supported product page.
///
/// Immutable once created. When the page's price changes a new record
/// supersedes the old one; records are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product name, at most [`MAX_NAME_CHARS`] characters
    pub name: String,

    /// Price in whole currency units (0 when unknown)
    pub price: u64,

    /// Adapter that produced this record
    pub platform: Platform,

    /// Page URL
    pub url: String,

    /// Product image URL (empty when unknown)
    pub image: String,
}

impl ProductRecord {
    /// Create an empty record for a page.
    pub fn empty(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
            ..Default::default()
        }
    }

    /// A record is a detection once it has both a name and a positive price.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && self.price > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_is_incomplete() {
        let record = ProductRecord::empty(Platform::Amazon, "https://www.amazon.in/dp/B0C");
        assert_eq!(record.name, "");
        assert_eq!(record.price, 0);
        assert_eq!(record.platform, Platform::Amazon);
        assert!(!record.is_complete());
    }

    #[test]
    fn test_complete_needs_name_and_price() {
        let mut record = ProductRecord::empty(Platform::Flipkart, "u");
        record.name = "Phone".to_string();
        assert!(!record.is_complete());
        record.price = 1;
        assert!(record.is_complete());
    }

    #[test]
    fn test_platform_serializes_as_display_name() {
        let json = serde_json::to_string(&Platform::Flipkart).unwrap();
        assert_eq!(json, "\"Flipkart\"");
    }
}
