use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

/// Memo of raw campaign-details responses keyed by campaign name.
///
/// Best-effort only: nothing reads it on the derivation path, so a miss or an
/// eviction never changes a result.
pub trait SchemaCache: Send + Sync {
    fn get(&self, campaign_name: &str) -> Option<Value>;
    fn put(&self, campaign_name: &str, response: Value);
}

/// Cache that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSchemaCache;

impl SchemaCache for NoopSchemaCache {
    fn get(&self, _campaign_name: &str) -> Option<Value> {
        None
    }

    fn put(&self, _campaign_name: &str, _response: Value) {}
}

/// In-memory cache holding at most `capacity` campaigns. The oldest insert is
/// evicted first; re-inserting a campaign refreshes its position.
pub struct BoundedSchemaCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, Value>,
    order: VecDeque<String>,
}

impl BoundedSchemaCache {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BoundedSchemaCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl SchemaCache for BoundedSchemaCache {
    fn get(&self, campaign_name: &str) -> Option<Value> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.get(campaign_name).cloned()
    }

    fn put(&self, campaign_name: &str, response: Value) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if inner.entries.contains_key(campaign_name) {
            inner.order.retain(|k| k != campaign_name);
        } else {
            while inner.entries.len() >= self.capacity {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        inner.order.push_back(campaign_name.to_string());
        inner.entries.insert(campaign_name.to_string(), response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_noop_stores_nothing() {
        let cache = NoopSchemaCache;
        cache.put("a", json!({"success": true}));
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = BoundedSchemaCache::new(4);
        cache.put("a", json!(1));
        cache.put("a", json!(2));
        assert_eq!(cache.get("a"), Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let cache = BoundedSchemaCache::new(2);
        cache.put("a", json!(1));
        cache.put("b", json!(2));
        cache.put("a", json!(3)); // refresh "a"; "b" is now oldest
        cache.put("c", json!(4));
        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("a"), Some(json!(3)));
        assert_eq!(cache.get("c"), Some(json!(4)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_noop() {
        let cache = BoundedSchemaCache::new(0);
        cache.put("a", json!(1));
        assert!(cache.is_empty());
    }
}
