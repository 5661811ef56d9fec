//! Cache Module
//!
//! Provides an in-memory key/value store with per-entry TTL expiration and
//! the `Cache` trait that every backend implements.

mod backend;
mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use backend::Cache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{ttl_from_millis, ttl_from_secs, CacheEntry, Ttl};
pub use stats::CacheStats;
pub use store::CacheStore;
