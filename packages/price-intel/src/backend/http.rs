//! `reqwest` client for the watchlist/auth API.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{PriceIntelError, Result};
use crate::session::{AuthToken, User};
use crate::traits::backend::{AddWatchlistRequest, ApiResponse, BackendApi, UserResponse};
use crate::types::config::BackendConfig;

/// Backend reached over HTTP with bearer-token auth.
///
/// # Example
///
/// ```rust,ignore
/// use price_intel::{BackendConfig, HttpBackend};
///
/// let backend = HttpBackend::new(&BackendConfig::default())?;
/// let user = backend.current_user(&token).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client for the configured base URL.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("price-intel/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, parse_base(&config.base_url)?))
    }

    /// Use a custom HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path such as `watchlist/add` against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

/// Parse a base URL, making sure relative joins append to its path.
fn parse_base(raw: &str) -> Result<Url> {
    let mut base = Url::parse(raw)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn add_to_watchlist(
        &self,
        token: &AuthToken,
        request: &AddWatchlistRequest,
    ) -> Result<ApiResponse> {
        let url = self.endpoint("watchlist/add")?;
        debug!(url = %url, product_url = %request.url, "Adding to remote watchlist");

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(token.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Watchlist request failed");
                PriceIntelError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<ApiResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                Err(PriceIntelError::Backend(format!("HTTP {status}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn current_user(&self, token: &AuthToken) -> Result<Option<User>> {
        let url = self.endpoint("auth/me")?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = %status, "Token rejected");
            return Ok(None);
        }

        let body: UserResponse = response.json().await?;
        Ok(if body.success { body.user } else { None })
    }
}
