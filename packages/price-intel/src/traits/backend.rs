//! Remote API used for the watchlist and session checks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::{AuthToken, User};
use crate::types::product::{Platform, ProductRecord};

/// Body of `POST /watchlist/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddWatchlistRequest {
    pub product_name: String,
    pub current_price: u64,
    pub url: String,
    pub platform: Platform,
}

impl From<&ProductRecord> for AddWatchlistRequest {
    fn from(product: &ProductRecord) -> Self {
        Self {
            product_name: product.name.clone(),
            current_price: product.price,
            url: product.url.clone(),
            platform: product.platform,
        }
    }
}

/// `{success, error?}` envelope returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// `{success, user}` envelope returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// Backend calls made with a bearer token.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Register a product on the user's remote watchlist.
    async fn add_to_watchlist(
        &self,
        token: &AuthToken,
        request: &AddWatchlistRequest,
    ) -> Result<ApiResponse>;

    /// User the token belongs to, or `None` when the backend rejects it.
    async fn current_user(&self, token: &AuthToken) -> Result<Option<User>>;
}
