//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the library without
//! a browser or a running backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{PriceIntelError, Result};
use crate::observer::{PageSnapshot, PageSource};
use crate::session::{AuthToken, Session, User};
use crate::traits::backend::{AddWatchlistRequest, ApiResponse, BackendApi};

/// Amazon product page URL.
pub const AMAZON_URL: &str = "https://www.amazon.in/dp/B0CHX1W1XY";

/// Flipkart product page URL.
pub const FLIPKART_URL: &str = "https://www.flipkart.com/samsung-galaxy-s23/p/itm123";

/// Trimmed-down Amazon product page.
pub const AMAZON_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Amazon.in</title></head>
<body>
  <div id="centerCol">
    <h1 id="title">
      <span id="productTitle" class="a-size-large product-title-word-break">
        Apple iPhone 15 (128 GB) - Black
      </span>
    </h1>
    <div id="corePrice">
      <span class="a-price">
        <span class="a-offscreen">₹69,900.00</span>
        <span class="a-price-whole">69,900<span class="a-price-decimal">.</span></span>
      </span>
    </div>
  </div>
  <div id="imgTagWrapperId">
    <img id="landingImage" class="a-dynamic-image"
         src="https://m.media-amazon.com/images/I/iphone15.jpg" alt="iPhone 15">
  </div>
</body>
</html>"#;

/// Trimmed-down Flipkart product page.
pub const FLIPKART_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <div class="_1YokD2">
    <img class="_396cs4 _2amPTt" src="https://rukminim2.flixcart.com/image/s23.jpeg" alt="">
  </div>
  <div class="_1AtVbE">
    <h1 class="yhB1nd"><span class="B_NuCI">Samsung Galaxy S23 5G (Phantom Black, 128 GB)</span></h1>
    <div class="_25b18c"><div class="_30jeq3 _16Jk6d">₹54,999</div></div>
  </div>
</body>
</html>"#;

/// A page whose markup tests can swap out.
///
/// Counts snapshots so tests can assert how often extraction ran.
pub struct MockPage {
    url: String,
    html: RwLock<String>,
    snapshots: AtomicUsize,
}

impl MockPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: RwLock::new(html.into()),
            snapshots: AtomicUsize::new(0),
        }
    }

    /// Replace the page markup.
    pub fn set_html(&self, html: impl Into<String>) {
        *self.html.write().unwrap() = html.into();
    }

    /// Number of snapshots taken so far.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }
}

impl PageSource for MockPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn snapshot(&self) -> PageSnapshot {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        PageSnapshot::new(self.url.clone(), self.html.read().unwrap().clone())
    }
}

/// User returned by [`MockBackend`] for [`demo_session`].
pub fn demo_user() -> User {
    User {
        name: "Demo User".to_string(),
        email: "demo@example.com".to_string(),
    }
}

/// Logged-in session with the token `demo_token`.
pub fn demo_session() -> Session {
    Session::authenticated("demo_token", demo_user())
}

/// Record of a call made to the mock backend.
#[derive(Debug, Clone)]
pub enum MockBackendCall {
    AddToWatchlist {
        token: String,
        request: AddWatchlistRequest,
    },
    CurrentUser {
        token: String,
    },
}

/// A mock backend for testing.
///
/// Accepts every watchlist add by default. Clones share state, so a test
/// can keep one handle for assertions.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Known tokens
    users: Arc<RwLock<HashMap<String, User>>>,

    /// Error payload returned for watchlist adds
    add_error: Option<String>,

    /// Fail every call at the transport level
    failing: bool,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockBackendCall>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a token for a user.
    pub fn with_user(self, token: impl Into<String>, user: User) -> Self {
        self.users.write().unwrap().insert(token.into(), user);
        self
    }

    /// Answer watchlist adds with `{success: false, error}`.
    pub fn rejecting_adds(mut self, error: impl Into<String>) -> Self {
        self.add_error = Some(error.into());
        self
    }

    /// Fail every call as if the backend were unreachable.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Calls made so far.
    pub fn calls(&self) -> Vec<MockBackendCall> {
        self.calls.read().unwrap().clone()
    }

    fn record(&self, call: MockBackendCall) {
        self.calls.write().unwrap().push(call);
    }

    fn check_reachable(&self) -> Result<()> {
        if self.failing {
            return Err(PriceIntelError::Backend("mock backend unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn add_to_watchlist(
        &self,
        token: &AuthToken,
        request: &AddWatchlistRequest,
    ) -> Result<ApiResponse> {
        self.record(MockBackendCall::AddToWatchlist {
            token: token.expose().to_string(),
            request: request.clone(),
        });
        self.check_reachable()?;

        Ok(match &self.add_error {
            Some(error) => ApiResponse::failed(error.clone()),
            None => ApiResponse::ok(),
        })
    }

    async fn current_user(&self, token: &AuthToken) -> Result<Option<User>> {
        self.record(MockBackendCall::CurrentUser {
            token: token.expose().to_string(),
        });
        self.check_reachable()?;

        Ok(self.users.read().unwrap().get(token.expose()).cloned())
    }
}
