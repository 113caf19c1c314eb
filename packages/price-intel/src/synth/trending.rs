//! Canned list of popular searches shown before the user types anything.

use serde::{Deserialize, Serialize};

use super::bucket::Category;

/// A popular query with its search count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingQuery {
    pub name: String,
    pub searches: u32,
    pub icon: String,
    pub category: Category,
}

const TRENDING: &[(&str, u32, &str)] = &[
    ("iPhone 15 Pro", 145, "📱"),
    ("Nike Air Max", 98, "👟"),
    ("MacBook Air", 87, "💻"),
    ("AirPods Pro", 76, "🎧"),
    ("Samsung Galaxy S23", 65, "📱"),
    ("Sony Headphones", 54, "🎧"),
];

/// Trending queries, most searched first.
pub fn trending() -> Vec<TrendingQuery> {
    TRENDING
        .iter()
        .map(|(name, searches, icon)| TrendingQuery {
            name: name.to_string(),
            searches: *searches,
            icon: icon.to_string(),
            category: Category::classify(name),
        })
        .collect()
}
