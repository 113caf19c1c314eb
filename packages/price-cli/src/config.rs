use anyhow::{Context, Result};
use dotenvy::dotenv;
use price_intel::{BackendConfig, ObserverConfig, SynthesizerConfig};
use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub latency_ms: u64,
    pub seed: Option<u64>,
    pub poll_interval_ms: u64,
    pub max_wait_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let synth = SynthesizerConfig::default();
        let observer = ObserverConfig::default();

        Ok(Self {
            api_url: env::var("PRICE_INTEL_API_URL")
                .unwrap_or_else(|_| BackendConfig::default().base_url),
            latency_ms: parse_var("PRICE_INTEL_LATENCY_MS")?.unwrap_or(synth.latency_ms),
            seed: parse_var("PRICE_INTEL_SEED")?,
            poll_interval_ms: parse_var("PRICE_INTEL_POLL_INTERVAL_MS")?
                .unwrap_or(observer.poll_interval_ms),
            max_wait_ms: parse_var("PRICE_INTEL_MAX_WAIT_MS")?.unwrap_or(observer.max_wait_ms),
        })
    }

    pub fn synthesizer(&self) -> SynthesizerConfig {
        let config = SynthesizerConfig::new().with_latency_ms(self.latency_ms);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    pub fn observer(&self) -> ObserverConfig {
        ObserverConfig::new()
            .with_poll_interval_ms(self.poll_interval_ms)
            .with_max_wait_ms(self.max_wait_ms)
    }

    pub fn backend(&self) -> BackendConfig {
        BackendConfig::new(self.api_url.clone())
    }
}

fn parse_var(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a valid number")),
        Err(_) => Ok(None),
    }
}
