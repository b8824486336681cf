//! Hash Ring Module
//!
//! Consistent hashing of keys onto peer names using virtual nodes.

use std::collections::HashMap;

/// Hash function placing keys and virtual nodes on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Virtual nodes per peer when none is configured
pub const DEFAULT_REPLICAS: usize = 50;

// == Hash Ring ==
/// Maps keys to peers.
///
/// Every peer owns `replicas` positions on a `u32` ring, at the hash of
/// `"{i}{peer}"` for `i` in `0..replicas`. A key belongs to the owner of
/// the first position at or after the key's hash, wrapping to the lowest
/// position. Peers cannot be removed; rebuild the ring instead.
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted, deduplicated ring positions
    positions: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring hashing with CRC-32C.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32c::crc32c)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    // == Add ==
    /// Places every peer's virtual nodes on the ring.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{i}{peer}").as_bytes());
                self.positions.push(position);
                self.owners.insert(position, peer.to_string());
            }
        }
        self.positions.sort_unstable();
        self.positions.dedup();
    }

    // == Get ==
    /// Returns the peer owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[idx % self.positions.len()];
        self.owners.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Treats the input as a decimal number, so positions are predictable.
    fn decimal_hash(data: &[u8]) -> u32 {
        std::str::from_utf8(data)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    #[test]
    fn test_empty_ring() {
        let ring = HashRing::new(3);
        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn test_hashing() {
        let mut ring = HashRing::with_hasher(3, decimal_hash);

        // Positions: 2, 4, 6, 12, 14, 16, 22, 24, 26
        ring.add(["6", "4", "2"]);
        assert_eq!(ring.len(), 9);

        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, peer) in cases {
            assert_eq!(ring.get(key), Some(peer), "key {key}");
        }

        // Adds 8, 18, 28; only "27" moves
        ring.add(["8"]);
        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "8")];
        for (key, peer) in cases {
            assert_eq!(ring.get(key), Some(peer), "key {key}");
        }
    }

    #[test]
    fn test_wraps_past_highest_position() {
        let mut ring = HashRing::with_hasher(1, decimal_hash);
        ring.add(["10", "20"]);

        // "010" and "020" hash to 10 and 20
        assert_eq!(ring.get("25"), Some("10"));
        assert_eq!(ring.get("15"), Some("20"));
    }

    #[test]
    fn test_re_adding_peer_is_idempotent() {
        let mut ring = HashRing::new(10);
        ring.add(["http://a:8001", "http://b:8002"]);
        let before: Vec<_> = (0..100).map(|i| ring.get(&format!("key{i}")).map(str::to_string)).collect();

        ring.add(["http://a:8001"]);
        let after: Vec<_> = (0..100).map(|i| ring.get(&format!("key{i}")).map(str::to_string)).collect();

        assert_eq!(ring.len(), 20);
        assert_eq!(before, after);
    }

    #[test]
    fn test_spreads_keys_across_peers() {
        let peers = ["http://a:8001", "http://b:8002", "http://c:8003"];
        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        ring.add(peers);

        let mut counts = HashMap::new();
        for i in 0..3000 {
            if let Some(peer) = ring.get(&format!("key-{i}")) {
                *counts.entry(peer.to_string()).or_insert(0) += 1;
            }
        }

        assert_eq!(counts.len(), 3);
        for peer in peers {
            assert!(counts[peer] > 300, "{peer} got {}", counts[peer]);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        // Rings built from the same peers and replica count agree on every key.
        #[test]
        fn prop_deterministic(
            peers in prop::collection::hash_set("[a-z]{3,8}", 1..6),
            keys in prop::collection::vec("[a-zA-Z0-9]{1,16}", 1..100),
            replicas in 1usize..60
        ) {
            let mut first = HashRing::new(replicas);
            first.add(&peers);
            let mut second = HashRing::new(replicas);
            second.add(&peers);

            for key in &keys {
                prop_assert_eq!(first.get(key), second.get(key));
                prop_assert_eq!(first.get(key), first.get(key));
            }
        }

        // Adding a peer only moves keys onto the new peer.
        #[test]
        fn prop_minimal_disruption(
            peers in prop::collection::hash_set("[a-z]{3,8}", 1..6),
            newcomer in "[0-9]{3,8}",
            keys in prop::collection::vec("[a-zA-Z0-9]{1,16}", 1..200)
        ) {
            let mut ring = HashRing::new(DEFAULT_REPLICAS);
            ring.add(&peers);
            let before: Vec<String> = keys
                .iter()
                .filter_map(|key| ring.get(key).map(str::to_string))
                .collect();

            ring.add([&newcomer]);

            for (key, old_owner) in keys.iter().zip(&before) {
                let new_owner = ring.get(key);
                prop_assert!(
                    new_owner == Some(old_owner.as_str()) || new_owner == Some(newcomer.as_str()),
                    "key {} moved from {} to {:?}", key, old_owner, new_owner
                );
            }
        }
    }
}
