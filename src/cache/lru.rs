//! LRU Cache Module
//!
//! Byte-budgeted key/value table with least recently used eviction.
//!
//! Entries live in a node arena threaded into a doubly linked recency list,
//! indexed by key. Front = most recently used, back = least recently used.

use std::collections::HashMap;
use std::fmt;

/// Sentinel index for missing links.
const NULL_INDEX: usize = usize::MAX;

// == Value Trait ==
/// Anything the cache can hold; `size` counts toward the byte budget.
pub trait Value {
    fn size(&self) -> usize;
}

impl Value for String {
    fn size(&self) -> usize {
        self.len()
    }
}

/// Called with every entry removed by eviction.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

struct Node<V> {
    key: String,
    value: V,
    /// Neighbour toward the front (more recent)
    prev: usize,
    /// Neighbour toward the back (less recent)
    next: usize,
}

// == LRU Cache ==
/// A byte-budgeted LRU cache.
///
/// An entry costs `key.len() + value.size()` bytes. After every insert or
/// update, least recently used entries are evicted until usage fits the
/// budget again. A budget of 0 disables eviction entirely.
pub struct LruCache<V> {
    /// Byte budget, 0 = unlimited
    max_bytes: usize,
    /// Bytes currently accounted to resident entries
    used_bytes: usize,
    nodes: Vec<Node<V>>,
    index: HashMap<String, usize>,
    head: usize,
    tail: usize,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget and optional
    /// eviction callback.
    pub fn new(max_bytes: usize, on_evicted: Option<EvictionCallback<V>>) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            nodes: Vec::new(),
            index: HashMap::new(),
            head: NULL_INDEX,
            tail: NULL_INDEX,
            on_evicted,
        }
    }

    // == Get ==
    /// Looks up a key and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.nodes[idx].value)
    }

    // == Put ==
    /// Inserts or replaces a value, then evicts until within budget.
    pub fn put(&mut self, key: &str, value: V) {
        let size = value.size();

        if let Some(&idx) = self.index.get(key) {
            let node = &mut self.nodes[idx];
            self.used_bytes = self.used_bytes - node.value.size() + size;
            node.value = value;
            self.move_to_front(idx);
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Node {
                key: key.to_string(),
                value,
                prev: NULL_INDEX,
                next: NULL_INDEX,
            });
            self.index.insert(key.to_string(), idx);
            self.attach_front(idx);
            self.used_bytes += key.len() + size;
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any, and returns it.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        if self.tail == NULL_INDEX {
            return None;
        }

        let idx = self.tail;
        self.detach(idx);
        let node = self.swap_remove(idx);
        self.index.remove(&node.key);
        self.used_bytes -= node.key.len() + node.value.size();

        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&node.key, &node.value);
        }

        Some((node.key, node.value))
    }

    // == Length ==
    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the bytes accounted to resident entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Checks residency without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        let first = (self.head != NULL_INDEX).then_some(self.head);
        std::iter::successors(first, move |&idx| {
            let next = self.nodes[idx].next;
            (next != NULL_INDEX).then_some(next)
        })
        .map(move |idx| (self.nodes[idx].key.as_str(), &self.nodes[idx].value))
    }

    // == List Maintenance ==
    fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.detach(idx);
        self.attach_front(idx);
    }

    fn attach_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NULL_INDEX;
        self.nodes[idx].next = self.head;
        if self.head == NULL_INDEX {
            self.tail = idx;
        } else {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev == NULL_INDEX {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NULL_INDEX {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[idx].prev = NULL_INDEX;
        self.nodes[idx].next = NULL_INDEX;
    }

    /// Removes a detached node, moving the last arena slot into its place.
    fn swap_remove(&mut self, idx: usize) -> Node<V> {
        let node = self.nodes.swap_remove(idx);

        if idx < self.nodes.len() {
            let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
            if prev == NULL_INDEX {
                self.head = idx;
            } else {
                self.nodes[prev].next = idx;
            }
            if next == NULL_INDEX {
                self.tail = idx;
            } else {
                self.nodes[next].prev = idx;
            }
            if let Some(slot) = self.index.get_mut(&self.nodes[idx].key) {
                *slot = idx;
            }
        }

        node
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.nodes.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn keys(lru: &LruCache<String>) -> Vec<String> {
        lru.iter().map(|(k, _)| k.to_string()).collect()
    }

    #[test]
    fn test_get_hit_and_miss() {
        let mut lru = LruCache::new(0, None);
        lru.put("key1", "1234".to_string());

        assert_eq!(lru.get("key1"), Some(&"1234".to_string()));
        assert_eq!(lru.get("key2"), None);
    }

    #[test]
    fn test_remove_oldest() {
        let (k1, k2, k3) = ("key1", "key2", "k3");
        let (v1, v2, v3) = ("value1", "value2", "v3");
        let cap = k1.len() + k2.len() + v1.len() + v2.len();

        let mut lru = LruCache::new(cap, None);
        lru.put(k1, v1.to_string());
        lru.put(k2, v2.to_string());
        lru.put(k3, v3.to_string());

        assert!(lru.get("key1").is_none());
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_on_evicted_callback() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let callback: EvictionCallback<String> = Box::new(move |key: &str, _: &String| {
            sink.lock().unwrap().push(key.to_string());
        });

        let mut lru = LruCache::new(10, Some(callback));
        lru.put("key1", "123456".to_string());
        lru.put("k2", "k2".to_string());
        lru.put("k3", "k3".to_string());
        lru.put("k4", "k4".to_string());

        assert_eq!(*evicted.lock().unwrap(), vec!["key1", "k2"]);
    }

    #[test]
    fn test_update_adjusts_usage() {
        let mut lru = LruCache::new(0, None);
        lru.put("a", "xx".to_string());
        assert_eq!(lru.used_bytes(), 3);

        lru.put("a", "xxxxx".to_string());
        assert_eq!(lru.used_bytes(), 6);
        assert_eq!(lru.len(), 1);

        lru.put("a", "x".to_string());
        assert_eq!(lru.used_bytes(), 2);
    }

    #[test]
    fn test_update_marks_recent() {
        let mut lru = LruCache::new(0, None);
        lru.put("a", "1".to_string());
        lru.put("b", "2".to_string());
        lru.put("c", "3".to_string());

        lru.put("a", "4".to_string());

        assert_eq!(keys(&lru), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_get_promotes_entry() {
        // Room for exactly three 2-byte entries
        let mut lru = LruCache::new(6, None);
        lru.put("a", "1".to_string());
        lru.put("b", "2".to_string());
        lru.put("c", "3".to_string());

        lru.get("a");
        lru.put("d", "4".to_string());

        assert!(lru.contains("a"));
        assert!(!lru.contains("b"));
        assert_eq!(keys(&lru), vec!["d", "a", "c"]);
    }

    #[test]
    fn test_oversized_entry_is_evicted_immediately() {
        let mut lru = LruCache::new(4, None);
        lru.put("a", "1".to_string());
        lru.put("big", "0123456789".to_string());

        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_remove_oldest_empty_is_noop() {
        let mut lru: LruCache<String> = LruCache::new(10, None);
        assert!(lru.remove_oldest().is_none());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_zero_capacity_never_evicts() {
        let mut lru = LruCache::new(0, None);
        for i in 0..1000 {
            lru.put(&format!("key{i}"), "v".repeat(100));
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn test_index_survives_arena_compaction() {
        let mut lru = LruCache::new(0, None);
        for key in ["a", "b", "c", "d"] {
            lru.put(key, key.to_string());
        }

        // Evicting "a" moves the last arena slot ("d") into slot 0
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("a".to_string()));
        assert_eq!(lru.get("d"), Some(&"d".to_string()));
        assert_eq!(keys(&lru), vec!["d", "c", "b"]);

        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("b".to_string()));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("c".to_string()));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("d".to_string()));
        assert!(lru.is_empty());
    }
}
