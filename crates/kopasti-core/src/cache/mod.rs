//! Process-lifetime query cache.
//!
//! This module provides the `QueryCache` for storing fetched member data
//! under normalized query keys. Entries expire 5 minutes after they were
//! stored; expiry is checked on read, with `purge_expired` available for an
//! explicit sweep.

pub mod manager;

pub use manager::{CacheEntry, CacheKey, QueryCache, DEFAULT_TTL_SECS};
