//! Configuration types for synthesis, page observation, and the backend.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the quote synthesizer façade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// Artificial delay before results are returned, modelling a backend
    /// round trip. No I/O happens during it. Default: 1000ms.
    pub latency_ms: u64,

    /// Shortest accepted query after trimming. Default: 2.
    pub min_query_chars: usize,

    /// Seed for the random source. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1000,
            min_query_chars: 2,
            seed: None,
        }
    }
}

impl SynthesizerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the artificial latency.
    pub fn with_latency_ms(mut self, ms: u64) -> Self {
        self.latency_ms = ms;
        self
    }

    /// Set a fixed seed for reproducible results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the minimum query length.
    pub fn with_min_query_chars(mut self, chars: usize) -> Self {
        self.min_query_chars = chars;
        self
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Configuration for the page observer's polling phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Delay between extraction attempts while polling. Default: 1000ms.
    pub poll_interval_ms: u64,

    /// Give up polling after this long. Default: 10000ms.
    pub max_wait_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_wait_ms: 10_000,
        }
    }
}

impl ObserverConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the polling interval.
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the polling bound.
    pub fn with_max_wait_ms(mut self, ms: u64) -> Self {
        self.max_wait_ms = ms;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    /// Number of extraction attempts the polling phase makes.
    pub fn max_attempts(&self) -> u64 {
        self.max_wait_ms / self.poll_interval_ms.max(1)
    }
}

/// Configuration for the HTTP backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API base URL. Default: `http://localhost:5000/api`.
    pub base_url: String,

    /// Request timeout in seconds. Default: 10.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    /// Create a config for a base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
