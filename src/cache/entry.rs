//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{CacheError, Result};

// == Ttl ==
/// Remaining lifetime of a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The entry was stored with a zero TTL and never expires.
    Never,
    /// Time left before the entry expires.
    Remaining(Duration),
}

// == Signed TTL Conversion ==
/// Converts a signed second count into a TTL, rejecting negative values.
///
/// Zero converts to `Duration::ZERO`, the never-expires TTL.
pub fn ttl_from_secs(secs: i64) -> Result<Duration> {
    u64::try_from(secs)
        .map(Duration::from_secs)
        .map_err(|_| CacheError::InvalidArgument(format!("ttl must not be negative, got {secs}s")))
}

/// Converts a signed millisecond count into a TTL, rejecting negative values.
pub fn ttl_from_millis(millis: i64) -> Result<Duration> {
    u64::try_from(millis)
        .map(Duration::from_millis)
        .map_err(|_| {
            CacheError::InvalidArgument(format!("ttl must not be negative, got {millis}ms"))
        })
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: Arc<V>,
    /// Instant the entry was written
    pub created_at: Instant,
    /// Deadline, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry written at `now`.
    ///
    /// A zero `ttl` means the entry never expires. Returns `None` when
    /// `now + ttl` cannot be represented.
    pub fn new(value: V, now: Instant, ttl: Duration) -> Option<Self> {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(now.checked_add(ttl)?)
        };

        Some(Self {
            value: Arc::new(value),
            created_at: now,
            expires_at,
        })
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so
    /// it is gone the moment its TTL has fully elapsed.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`.
    ///
    /// An expired entry reports `Ttl::Remaining(Duration::ZERO)`.
    pub fn ttl_remaining(&self, now: Instant) -> Ttl {
        match self.expires_at {
            Some(expires) => Ttl::Remaining(expires.saturating_duration_since(now)),
            None => Ttl::Never,
        }
    }
}
