//! Debounced, cancellable rate quoting.
//!
//! Address edits at checkout arrive as a burst of changes. The quoter holds a
//! single "last requested key" per session surface: every quote request
//! records its normalized address key, waits out a short quiet period, and
//! only fires the carrier call if no newer key arrived in the meantime. A
//! completed fetch commits only if its key is still the latest - a stale
//! result for a superseded address is discarded outright. Comparing keys
//! (rather than a request counter) means two edits that land back on the
//! same address still dedupe correctly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::stallion::{Rate, StallionError};

/// Quiet period after the last address edit before a carrier call fires.
pub const DEBOUNCE_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Outcome of a quote attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    /// Fresh rates fetched for the current address key.
    Fetched(Vec<Rate>),
    /// The key matches the last completed fetch; no carrier call was made.
    Deduplicated(Vec<Rate>),
    /// A newer address key superseded this request; its result (if any)
    /// was discarded.
    Superseded,
}

#[derive(Default)]
struct QuoterState {
    /// The most recently requested address key; the token stale fetches
    /// compare against.
    requested_key: Option<String>,
    /// Key and rates of the last fetch that completed while still current.
    completed: Option<(String, Vec<Rate>)>,
}

/// Coordinates rate fetches for one checkout session.
#[derive(Clone, Default)]
pub struct RateQuoter {
    state: Arc<RwLock<QuoterState>>,
}

impl RateQuoter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quote rates for `key`, debouncing and discarding superseded results.
    ///
    /// `fetch` runs only if the key survives the quiet period; its result is
    /// committed only if the key is still the latest when it returns. Errors
    /// from `fetch` propagate so the caller can show a retryable state - no
    /// automatic retry happens here.
    ///
    /// # Errors
    ///
    /// Returns the fetch error unchanged when the carrier call fails while
    /// this key is still current.
    pub async fn quote<F, Fut>(&self, key: String, fetch: F) -> Result<QuoteOutcome, StallionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Rate>, StallionError>>,
    {
        {
            let mut state = self.state.write().await;
            if let Some((completed_key, rates)) = &state.completed
                && *completed_key == key
            {
                debug!(%key, "rate fetch deduplicated against last completed key");
                return Ok(QuoteOutcome::Deduplicated(rates.clone()));
            }
            state.requested_key = Some(key.clone());
        }

        tokio::time::sleep(DEBOUNCE_QUIET_PERIOD).await;
        if !self.is_current(&key).await {
            debug!(%key, "rate fetch superseded during quiet period");
            return Ok(QuoteOutcome::Superseded);
        }

        let rates = fetch().await?;

        let mut state = self.state.write().await;
        if state.requested_key.as_deref() != Some(key.as_str()) {
            debug!(%key, "stale rate result discarded");
            return Ok(QuoteOutcome::Superseded);
        }
        state.completed = Some((key, rates.clone()));
        Ok(QuoteOutcome::Fetched(rates))
    }

    /// Whether `key` is still the most recently requested address key.
    pub async fn is_current(&self, key: &str) -> bool {
        self.state.read().await.requested_key.as_deref() == Some(key)
    }

    /// Rates from the last completed fetch, if it was for `key`.
    pub async fn completed_for(&self, key: &str) -> Option<Vec<Rate>> {
        let state = self.state.read().await;
        state
            .completed
            .as_ref()
            .filter(|(k, _)| k == key)
            .map(|(_, rates)| rates.clone())
    }
}
