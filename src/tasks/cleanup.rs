//! Expiry Sweeper Task
//!
//! Optional background task that periodically purges expired entries. Stores
//! expire lazily without it; the sweeper only bounds how long expired but
//! untouched entries stay in memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that purges expired entries every `interval`.
///
/// The task runs until its handle is aborted.
///
/// # Example
/// ```ignore
/// let store = Arc::new(CacheStore::<String>::new());
/// let sweeper = spawn_sweeper(Arc::clone(&store), Duration::from_secs(30));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<V>(store: Arc<CacheStore<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval = ?interval, "Starting expiry sweeper");

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired();

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
