//! Background Tasks Module
//!
//! Contains optional background tasks that can run alongside a store.
//!
//! # Tasks
//! - Expiry sweeper: purges expired entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_sweeper;
