//! Aggregates over the quotes of one search.

use crate::types::quote::{Quote, Statistics};

fn rounded_mean(sum: u64, count: u64) -> u64 {
    (sum + count / 2) / count
}

impl Statistics {
    /// Summarize a set of quotes. Returns `None` for an empty set.
    pub fn from_quotes(quotes: &[Quote]) -> Option<Self> {
        let best = quotes.iter().min_by_key(|q| q.price)?;
        let count = quotes.len() as u64;

        let lowest_price = best.price;
        let highest_price = quotes.iter().map(|q| q.price).max().unwrap_or(lowest_price);
        let highest_original = quotes
            .iter()
            .map(|q| q.original_price)
            .max()
            .unwrap_or(lowest_price);
        let price_sum: u64 = quotes.iter().map(|q| q.price).sum();
        let discount_sum: u64 = quotes.iter().map(|q| u64::from(q.discount_percent)).sum();

        Some(Self {
            lowest_price,
            highest_price,
            average_price: rounded_mean(price_sum, count),
            stores_compared: quotes.len(),
            max_savings: highest_original.saturating_sub(lowest_price),
            average_discount: rounded_mean(discount_sum, count) as u32,
            best_platform: best.platform.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::quote::StockStatus;

    fn quote(platform: &str, price: u64, original_price: u64, discount_percent: u32) -> Quote {
        Quote {
            platform: platform.to_string(),
            platform_icon: String::new(),
            title: String::new(),
            price,
            original_price,
            discount_percent,
            rating: 4.0,
            reviews_count: 125,
            stock_status: StockStatus::InStock,
            delivery: "1-2 days".to_string(),
            seller: String::new(),
            url: String::new(),
            is_best_price: false,
        }
    }

    #[test]
    fn test_statistics_over_quotes() {
        let quotes = vec![
            quote("Flipkart", 100, 110, 10),
            quote("Amazon", 200, 260, 30),
            quote("Croma", 301, 320, 5),
        ];
        let stats = Statistics::from_quotes(&quotes).unwrap();

        assert_eq!(stats.lowest_price, 100);
        assert_eq!(stats.highest_price, 301);
        assert_eq!(stats.average_price, 200);
        assert_eq!(stats.stores_compared, 3);
        assert_eq!(stats.max_savings, 320 - 100);
        assert_eq!(stats.average_discount, 15);
        assert_eq!(stats.best_platform, "Flipkart");
    }

    #[test]
    fn test_average_rounds_half_up() {
        let quotes = vec![quote("A", 1, 1, 5), quote("B", 2, 2, 6)];
        let stats = Statistics::from_quotes(&quotes).unwrap();
        assert_eq!(stats.average_price, 2);
        assert_eq!(stats.average_discount, 6);
    }

    #[test]
    fn test_price_tie_goes_to_first_quote() {
        let quotes = vec![quote("First", 50, 60, 5), quote("Second", 50, 60, 5)];
        assert_eq!(Statistics::from_quotes(&quotes).unwrap().best_platform, "First");
    }

    #[test]
    fn test_empty_quotes_have_no_statistics() {
        assert_eq!(Statistics::from_quotes(&[]), None);
    }
}
