//! Seven-day price outlook as a bounded random walk around today's price.

use rand::Rng;

use crate::types::forecast::{BestTimeToBuy, ForecastPoint, ForecastSeries, Trend};

/// Days in a forecast.
pub const FORECAST_DAYS: usize = 7;

/// Reported confidence of the forecast as a whole.
pub const MODEL_CONFIDENCE: f64 = 0.85;

/// Largest daily move either way, as a fraction of today's price.
const MAX_DAILY_CHANGE: f64 = 0.02;

const DAY_LABELS: [&str; FORECAST_DAYS] = [
    "Tomorrow", "Day 2", "Day 3", "Day 4", "Day 5", "Day 6", "Day 7",
];
const DAY_NAMES: [&str; FORECAST_DAYS] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // -0.0 would compare equal to 0.0 but print as "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Forecast the next seven days from the current lowest price.
///
/// Each day's change is rounded to 0.1% before the predicted price is
/// computed from it, so `is_cheaper` always agrees with `change_percent`.
pub fn forecast<R: Rng + ?Sized>(current_lowest: u64, rng: &mut R) -> ForecastSeries {
    let predictions: Vec<ForecastPoint> = DAY_LABELS
        .iter()
        .zip(DAY_NAMES.iter())
        .map(|(label, name)| {
            let change = rng.gen_range(-MAX_DAILY_CHANGE..MAX_DAILY_CHANGE);
            let change_percent = round_to(change * 100.0, 1);
            let predicted_price =
                (current_lowest as f64 * (1.0 + change_percent / 100.0)).round() as u64;

            ForecastPoint {
                day_label: label.to_string(),
                day_of_week: name.to_string(),
                predicted_price,
                change_percent,
                is_cheaper: change_percent < 0.0,
                confidence: round_to(rng.gen_range(0.7..=0.9), 2),
            }
        })
        .collect();

    let cheaper_days = predictions.iter().filter(|p| p.is_cheaper).count();
    let (trend, recommendation) = if cheaper_days * 2 > FORECAST_DAYS {
        (Trend::Decreasing, "Wait 2-3 days for best price")
    } else {
        (Trend::Stable, "Good time to buy")
    };

    let best_time_to_buy = predictions
        .iter()
        .min_by_key(|p| p.predicted_price)
        .map(|best| BestTimeToBuy {
            day_label: best.day_label.clone(),
            day_of_week: best.day_of_week.clone(),
            savings: current_lowest.saturating_sub(best.predicted_price),
        })
        .unwrap_or_else(|| BestTimeToBuy {
            day_label: DAY_LABELS[0].to_string(),
            day_of_week: DAY_NAMES[0].to_string(),
            savings: 0,
        });

    ForecastSeries {
        current_lowest_price: current_lowest,
        predictions,
        trend,
        recommendation: recommendation.to_string(),
        best_time_to_buy,
        model_confidence: MODEL_CONFIDENCE,
    }
}
