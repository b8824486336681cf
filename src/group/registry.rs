//! Group Registry Module
//!
//! Name to group table shared by group creation and the peer server.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::CacheStats;
use crate::group::{Getter, Group};

// == Group Registry ==
/// All groups known to this node, keyed by name.
///
/// Created once at startup and shared for the life of the process; groups
/// are never removed.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group and registers it under `name`.
    ///
    /// A group already registered under the same name is replaced.
    pub async fn new_group<G>(&self, name: &str, cache_bytes: usize, getter: G) -> Arc<Group>
    where
        G: Getter + 'static,
    {
        let group = Arc::new(Group::new(name, cache_bytes, Arc::new(getter)));

        let previous = self
            .groups
            .write()
            .await
            .insert(name.to_string(), Arc::clone(&group));

        if previous.is_some() {
            warn!(group = name, "Replaced existing group");
        } else {
            info!(group = name, cache_bytes, "Group created");
        }
        group
    }

    // == Get Group ==
    pub async fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().await.get(name).cloned()
    }

    /// Returns the registered group names, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.groups.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.groups.read().await.is_empty()
    }

    // == Stats ==
    /// Snapshots the statistics of every group.
    pub async fn stats(&self) -> Vec<(String, CacheStats)> {
        let groups: Vec<Arc<Group>> = self.groups.read().await.values().cloned().collect();

        let mut stats = Vec::with_capacity(groups.len());
        for group in groups {
            stats.push((group.name().to_string(), group.stats().await));
        }
        stats.sort_by(|a, b| a.0.cmp(&b.0));
        stats
    }
}
