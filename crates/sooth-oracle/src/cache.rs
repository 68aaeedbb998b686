//! Injected result cache for the generate-and-cache pipeline.
//!
//! Generation calls cost real money, so identical requests are answered
//! from memory. The cache stores the already-serialized response payload:
//! a hit is returned verbatim, which also makes the "second call is
//! byte-identical" contract trivially true. Entries expire by policy —
//! a fixed TTL, or the end of the current UTC day for features whose
//! content should roll over daily — and expired entries are dropped lazily
//! on the next lookup. Cleared on process restart by construction.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// How long a stored entry stays valid.
#[derive(Debug, Clone, Copy)]
pub enum CachePolicy {
    /// Valid until the end of the current UTC calendar day.
    CalendarDay,
    /// Valid for a fixed duration from the moment of storage.
    Ttl(Duration),
}

impl CachePolicy {
    fn expires_at(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            CachePolicy::CalendarDay => next_utc_midnight(now),
            CachePolicy::Ttl(ttl) => {
                let ttl = chrono::Duration::from_std(ttl)
                    .unwrap_or_else(|_| chrono::Duration::days(36_500));
                now + ttl
            }
        }
    }
}

fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + chrono::Duration::days(1);
    tomorrow
        .and_hms_opt(0, 0, 0)
        .map_or(now, |midnight| midnight.and_utc())
}

/// Key→payload store injected into the request pipeline.
///
/// A trait so tests can substitute a double (or a no-op) for the shared
/// in-memory map.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn put(&self, key: &str, value: Value, policy: CachePolicy);
}

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    expires_at: DateTime<Utc>,
}

/// Process-wide in-memory cache. The mutex is held only for map access;
/// nothing awaits while holding it.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put_at(&self, key: &str, value: Value, policy: CachePolicy, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(
            key.to_owned(),
            CacheEntry {
                value,
                expires_at: policy.expires_at(now),
            },
        );
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Utc::now())
    }

    fn put(&self, key: &str, value: Value, policy: CachePolicy) {
        self.put_at(key, value, policy, Utc::now());
    }
}

/// Builds a cache key from a feature name and its input parts.
///
/// Parts are lowercased and joined with `:` so that equivalent requests
/// (`Bitcoin` vs `bitcoin`) share an entry.
#[must_use]
pub fn cache_key(feature: &str, parts: &[&str]) -> String {
    let mut key = String::from(feature);
    for part in parts {
        key.push(':');
        key.push_str(&part.to_lowercase());
    }
    key
}
