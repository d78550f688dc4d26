//! Cache invalidation signal
//!
//! Successful mutations announce which cached view is stale. Whatever sits in
//! front of the app (page cache, SSR layer) subscribes and purges.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Path whose cached rendering must be rebuilt after any social-graph change
pub const HOME_PATH: &str = "/";

const DEFAULT_CAPACITY: usize = 64;

/// A single "this path is stale" event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revalidation {
    pub path: String,
    pub at: DateTime<Utc>,
}

/// Broadcasts revalidation events to any number of subscribers
#[derive(Debug, Clone)]
pub struct Revalidator {
    tx: broadcast::Sender<Revalidation>,
}

impl Revalidator {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Revalidation> {
        self.tx.subscribe()
    }

    /// Mark `path` stale. Having no subscribers is not an error.
    pub fn revalidate_path(&self, path: &str) {
        let event = Revalidation {
            path: path.to_owned(),
            at: Utc::now(),
        };
        let receivers = self.tx.send(event).unwrap_or(0);
        tracing::debug!(path, receivers, "cache revalidation");
    }
}

impl Default for Revalidator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events() {
        let revalidator = Revalidator::default();
        let mut rx = revalidator.subscribe();

        revalidator.revalidate_path(HOME_PATH);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.path, "/");
    }

    #[test]
    fn no_subscribers_is_fine() {
        Revalidator::new(0).revalidate_path("/");
    }
}
