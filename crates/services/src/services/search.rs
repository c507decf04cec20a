//! Debounced typeahead search.
//!
//! Each call to [`SearchDebouncer::schedule`] aborts the pending search and
//! starts a new one that waits out the quiet period before hitting the API.
//! Results are published on a watch channel, separate from the store's main list.

use std::{sync::Arc, time::Duration};

use domain::Record;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use super::{
    api_client::{ApiClient, ApiRequest},
    message::Silent,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

pub struct SearchDebouncer<T: Record> {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tx: Arc<watch::Sender<Vec<T>>>,
    rx: watch::Receiver<Vec<T>>,
}

impl<T: Record> SearchDebouncer<T> {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        Self {
            delay,
            pending: None,
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Supersede any pending search with a fetch of `path`. Must be called
    /// from within a tokio runtime.
    pub fn schedule(&mut self, client: ApiClient, path: String) {
        self.cancel();

        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(path = %path, "running debounced search");

            let response = match client.send(ApiRequest::get(path.as_str()), &Silent).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(path = %path, error = %e, "search request failed");
                    return;
                }
            };
            match response.page::<T>() {
                Ok(page) => {
                    tx.send_replace(page.map(|p| p.results).unwrap_or_default());
                }
                Err(e) => warn!(path = %path, error = %e, "search response did not parse"),
            }
        }));
    }

    /// Abort the pending search, if any. Published results are kept.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Abort the pending search and empty the results right away.
    pub fn clear(&mut self) {
        self.cancel();
        self.tx.send_replace(Vec::new());
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn results(&self) -> Vec<T> {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.rx.clone()
    }

    /// Wait for the pending search, if any, to finish.
    pub async fn settled(&mut self) {
        if let Some(handle) = self.pending.take() {
            // Aborted or panicked tasks leave the previous results in place.
            let _ = handle.await;
        }
    }
}

impl<T: Record> Drop for SearchDebouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T: Record> std::fmt::Debug for SearchDebouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDebouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .field("results", &self.rx.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use domain::models::product::Product;

    use super::*;

    #[tokio::test]
    async fn test_clear_without_pending_search() {
        let mut search = SearchDebouncer::<Product>::new(DEFAULT_DEBOUNCE);
        search.clear();
        assert!(search.results().is_empty());
        assert!(!search.is_pending());
    }

    #[tokio::test]
    async fn test_superseded_search_is_cancelled() {
        // Nothing listens on port 9; a search that actually ran would only log.
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let mut search = SearchDebouncer::<Product>::new(Duration::from_secs(60));

        search.schedule(client.clone(), "/products?search=eg".into());
        search.schedule(client, "/products?search=egg".into());
        assert!(search.is_pending());

        search.cancel();
        assert!(!search.is_pending());
        search.settled().await;
        assert!(search.results().is_empty());
    }
}
