//! Static registry of the retailers quotes are synthesized for.

/// Per-retailer metadata. Read-only and process-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetailerProfile {
    pub name: &'static str,
    pub icon: &'static str,

    /// Added to the bucket minimum to get this retailer's base price
    pub base_price_offset: u64,

    pub seller: &'static str,

    /// `{query}` is replaced with the raw query
    pub title_template: &'static str,

    /// `{q}` is replaced with the URL-encoded query, `{slug}` with the
    /// encoded lower-case hyphenated query
    pub search_url_template: &'static str,
}

impl RetailerProfile {
    /// Listing title for a query.
    pub fn title(&self, query: &str) -> String {
        self.title_template.replace("{query}", query)
    }

    /// Search page URL for a query.
    pub fn search_url(&self, query: &str) -> String {
        let slug = query
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        self.search_url_template
            .replace("{q}", &urlencoding::encode(query))
            .replace("{slug}", &urlencoding::encode(&slug))
    }
}

/// Every retailer, in quote generation order.
pub const RETAILERS: &[RetailerProfile] = &[
    RetailerProfile {
        name: "Amazon",
        icon: "📦",
        base_price_offset: 2000,
        seller: "Cloudtail India",
        title_template: "{query} (Latest Model) - with 1 Year Warranty",
        search_url_template: "https://www.amazon.in/s?k={q}",
    },
    RetailerProfile {
        name: "Flipkart",
        icon: "🛒",
        base_price_offset: 1500,
        seller: "RetailNet",
        title_template: "{query} - SuperCoin Offer Available",
        search_url_template: "https://www.flipkart.com/search?q={q}",
    },
    RetailerProfile {
        name: "Myntra",
        icon: "👕",
        base_price_offset: 3000,
        seller: "Myntra Fashions",
        title_template: "{query} | Fashion Edition",
        search_url_template: "https://www.myntra.com/{slug}",
    },
    RetailerProfile {
        name: "Reliance Digital",
        icon: "🔷",
        base_price_offset: 2500,
        seller: "Reliance Retail",
        title_template: "{query} with Extended Warranty",
        search_url_template: "https://www.reliancedigital.in/search?q={q}",
    },
    RetailerProfile {
        name: "Croma",
        icon: "🔴",
        base_price_offset: 2200,
        seller: "Croma Electronics",
        title_template: "{query} - Croma Assured",
        search_url_template: "https://www.croma.com/search/?q={q}",
    },
    RetailerProfile {
        name: "Tata CLiQ",
        icon: "🛍️",
        base_price_offset: 2800,
        seller: "Tata Retail",
        title_template: "{query} - Premium Edition",
        search_url_template: "https://www.tatacliq.com/search/?searchCategory=all&text={q}",
    },
];

/// Look up a retailer by display name.
pub fn retailer(name: &str) -> Option<&'static RetailerProfile> {
    RETAILERS.iter().find(|r| r.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_six_unique_retailers() {
        assert_eq!(RETAILERS.len(), 6);
        for r in RETAILERS {
            assert_eq!(retailer(r.name), Some(r));
        }
    }

    #[test]
    fn test_flipkart_has_lowest_offset() {
        let cheapest = RETAILERS.iter().min_by_key(|r| r.base_price_offset).unwrap();
        assert_eq!(cheapest.name, "Flipkart");
    }

    #[test]
    fn test_search_urls_encode_query() {
        let amazon = retailer("Amazon").unwrap();
        assert_eq!(amazon.search_url("iPhone 15"), "https://www.amazon.in/s?k=iPhone%2015");

        let myntra = retailer("Myntra").unwrap();
        assert_eq!(myntra.search_url("Nike Air  Max"), "https://www.myntra.com/nike-air-max");
    }

    #[test]
    fn test_title_template() {
        let croma = retailer("Croma").unwrap();
        assert_eq!(croma.title("Sony TV"), "Sony TV - Croma Assured");
    }
}
