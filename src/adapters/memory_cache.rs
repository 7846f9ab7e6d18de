//! In-Memory Behavioral Cache
//!
//! RwLock-guarded map implementing the `BehavioralStore` contract.
//! Entries are independent per (chain, address, data class) key, so a
//! single map with short write sections is enough: concurrent analyses
//! never contend on overlapping state for different tokens, and
//! last-writer-wins on a same-key race is accepted behavior.
//! Expired entries are evicted lazily on lookup, with an optional
//! `cleanup()` sweep for long-running processes.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::ports::behavioral::BehavioralValue;
use crate::ports::cache::{BehavioralStore, CacheError, CacheKey};

/// Cache entry with TTL tracking
#[derive(Debug, Clone)]
struct CacheEntry {
    value: BehavioralValue,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(value: BehavioralValue, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
        }
    }

    fn is_valid(&self) -> bool {
        self.inserted_at.elapsed() < self.ttl
    }
}

/// In-memory TTL store for behavioral data
#[derive(Debug)]
pub struct InMemoryBehavioralCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    max_entries: usize,
}

impl InMemoryBehavioralCache {
    /// Default bound on resident entries
    pub const DEFAULT_MAX_ENTRIES: usize = 50_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Remove expired entries
    pub fn cleanup(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| entry.is_valid());
    }

    /// Number of resident entries, including expired ones awaiting
    /// lazy eviction
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of entry counts
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let total = entries.len();
        let valid = entries.values().filter(|e| e.is_valid()).count();
        CacheStats {
            total_entries: total,
            valid_entries: valid,
            expired_entries: total - valid,
        }
    }

    fn remove_oldest(entries: &mut HashMap<CacheKey, CacheEntry>) {
        if let Some(oldest_key) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone())
        {
            entries.remove(&oldest_key);
        }
    }
}

impl Default for InMemoryBehavioralCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BehavioralStore for InMemoryBehavioralCache {
    fn get(&self, key: &CacheKey) -> Result<Option<BehavioralValue>, CacheError> {
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(key) {
                Some(entry) if entry.is_valid() => return Ok(Some(entry.value.clone())),
                Some(_) => {} // expired, evict below
                None => return Ok(None),
            }
        }
        // Lazy eviction of the expired entry
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get(key) {
            if !entry.is_valid() {
                entries.remove(key);
            }
        }
        Ok(None)
    }

    fn set(&self, key: CacheKey, value: BehavioralValue, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            entries.retain(|_, entry| entry.is_valid());
            if entries.len() >= self.max_entries {
                Self::remove_oldest(&mut entries);
            }
        }
        entries.insert(key, CacheEntry::new(value, ttl));
        Ok(())
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chain;
    use crate::ports::behavioral::HolderSnapshot;
    use crate::ports::cache::DataClass;

    fn key(address: &str, class: DataClass) -> CacheKey {
        CacheKey::new(Chain::Ethereum, address, class)
    }

    fn holder_value(change: f64) -> BehavioralValue {
        BehavioralValue::Holder(HolderSnapshot {
            holder_change_24h_pct: change,
            smart_money_holders: 2,
        })
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let cache = InMemoryBehavioralCache::new();
        let k = key("0xabc", DataClass::HolderHistory);
        cache
            .set(k.clone(), holder_value(5.0), Duration::from_secs(60))
            .unwrap();
        assert_eq!(cache.get(&k).unwrap(), Some(holder_value(5.0)));
    }

    #[test]
    fn test_get_after_ttl_expiry_is_miss() {
        let cache = InMemoryBehavioralCache::new();
        let k = key("0xabc", DataClass::LiquidityHistory);
        cache
            .set(k.clone(), holder_value(1.0), Duration::from_millis(10))
            .unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&k).unwrap(), None);
        // Expired entry was evicted lazily on lookup
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_classes_do_not_share_entries() {
        let cache = InMemoryBehavioralCache::new();
        let holder_key = key("0xabc", DataClass::HolderHistory);
        let wallet_key = key("0xabc", DataClass::WalletAge);
        cache
            .set(holder_key.clone(), holder_value(2.0), Duration::from_secs(60))
            .unwrap();
        assert!(cache.get(&holder_key).unwrap().is_some());
        assert!(cache.get(&wallet_key).unwrap().is_none());
    }

    #[test]
    fn test_case_insensitive_addresses_hit_same_entry() {
        let cache = InMemoryBehavioralCache::new();
        cache
            .set(
                key("0xAbCd", DataClass::HolderHistory),
                holder_value(3.0),
                Duration::from_secs(60),
            )
            .unwrap();
        let lower = key("0xabcd", DataClass::HolderHistory);
        assert!(cache.get(&lower).unwrap().is_some());
    }

    #[test]
    fn test_last_writer_wins_on_overwrite() {
        let cache = InMemoryBehavioralCache::new();
        let k = key("0xabc", DataClass::HolderHistory);
        cache
            .set(k.clone(), holder_value(1.0), Duration::from_secs(60))
            .unwrap();
        cache
            .set(k.clone(), holder_value(9.0), Duration::from_secs(60))
            .unwrap();
        assert_eq!(cache.get(&k).unwrap(), Some(holder_value(9.0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_max_entries_bound_enforced() {
        let cache = InMemoryBehavioralCache::with_capacity(3);
        for i in 0..6 {
            cache
                .set(
                    key(&format!("0x{}", i), DataClass::HolderHistory),
                    holder_value(i as f64),
                    Duration::from_secs(60),
                )
                .unwrap();
        }
        assert!(cache.len() <= 3);
    }

    #[test]
    fn test_cleanup_sweeps_expired() {
        let cache = InMemoryBehavioralCache::new();
        for i in 0..4 {
            cache
                .set(
                    key(&format!("0x{}", i), DataClass::HolderHistory),
                    holder_value(0.0),
                    Duration::from_millis(10),
                )
                .unwrap();
        }
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.stats().expired_entries, 4);
        cache.cleanup();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access_does_not_corrupt() {
        use std::sync::Arc;

        let cache = Arc::new(InMemoryBehavioralCache::new());
        let mut handles = Vec::new();
        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let k = key(&format!("0x{}", i % 10), DataClass::HolderHistory);
                    cache
                        .set(k.clone(), holder_value(t as f64), Duration::from_secs(60))
                        .unwrap();
                    let _ = cache.get(&k).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 10);
    }
}
