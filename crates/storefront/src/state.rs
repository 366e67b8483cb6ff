//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::config::StorefrontConfig;
use crate::rates::RateQuoter;
use crate::services::checkout::CheckoutClient;
use crate::stallion::StallionClient;

/// Idle time before a session's rate quoter is dropped.
const QUOTER_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Rate quoters are per-session: each customer
/// debounces against their own address edits, never each other's.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stallion: StallionClient,
    checkout: CheckoutClient,
    quoters: Cache<String, RateQuoter>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let stallion = StallionClient::new(&config.stallion);
        let checkout = CheckoutClient::new(
            config.checkout_function_url.clone(),
            config.backend_service_key.clone(),
        );
        let quoters = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(QUOTER_IDLE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                stallion,
                checkout,
                quoters,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Stallion rate client.
    #[must_use]
    pub fn stallion(&self) -> &StallionClient {
        &self.inner.stallion
    }

    /// Get a reference to the checkout-session client.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.inner.checkout
    }

    /// The rate quoter for a session, created on first use.
    pub async fn quoter_for(&self, session_key: &str) -> RateQuoter {
        self.inner
            .quoters
            .get_with(session_key.to_string(), async { RateQuoter::new() })
            .await
    }
}
