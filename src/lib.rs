//! Mini Cache - an in-process key/value cache with per-entry TTL
//!
//! Provides an expiring store with lazy eviction and a registry that
//! dispatches to any number of named caches.

pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod tasks;

pub use cache::{Cache, CacheStore, Ttl};
pub use config::Config;
pub use error::{CacheError, Result};
pub use registry::{Registry, RegistryConfig};
pub use tasks::spawn_sweeper;
