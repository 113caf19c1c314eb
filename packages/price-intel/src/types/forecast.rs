//! Forecast types - a 7-day synthetic price outlook.

use serde::{Deserialize, Serialize};

/// One day of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// "Tomorrow", "Day 2", ...
    pub day_label: String,

    /// "Mon", "Tue", ...
    pub day_of_week: String,

    pub predicted_price: u64,

    /// Change against the current lowest price, in percent (-2.0..=2.0)
    pub change_percent: f64,

    /// True exactly when `change_percent < 0`
    pub is_cheaper: bool,

    /// 0.7..=0.9
    pub confidence: f64,
}

/// Overall direction of a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Decreasing,
    Stable,
}

/// Cheapest forecast day and what waiting for it saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestTimeToBuy {
    pub day_label: String,
    pub day_of_week: String,
    pub savings: u64,
}

/// Seven consecutive forecast points plus the aggregate outlook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub current_lowest_price: u64,
    pub predictions: Vec<ForecastPoint>,
    pub trend: Trend,
    pub recommendation: String,
    pub best_time_to_buy: BestTimeToBuy,
    pub model_confidence: f64,
}

impl ForecastSeries {
    /// Number of days predicted to be cheaper than today.
    pub fn cheaper_days(&self) -> usize {
        self.predictions.iter().filter(|p| p.is_cheaper).count()
    }
}
