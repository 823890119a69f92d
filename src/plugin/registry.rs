//! Plugin Registry
//!
//! Thread-safe storage for registered plugin instances with lifecycle
//! tracking and a stable dispatch order. Ordering is (priority ascending,
//! insertion index ascending); the insertion index is assigned once at
//! registration and survives disable/enable cycles, so ties between equal
//! priorities always resolve the same way.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::BotPlugin;
use crate::plugin::types::{PluginState, PluginStatus};

struct PluginEntry {
    plugin: Arc<dyn BotPlugin>,
    state: PluginState,
    last_error: Option<String>,
    /// Total recorded failures over the plugin's lifetime
    error_count: u32,
    inserted: u64,
}

/// Plugin registry for registered plugin instances
pub struct PluginRegistry {
    entries: HashMap<String, PluginEntry>,
    next_index: u64,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PluginRegistry {
    /// Create a new empty plugin registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_index: 0,
        }
    }

    /// Insert a plugin with its initial lifecycle state.
    ///
    /// The caller (PluginManager) has already run setup; `state` reflects
    /// its outcome. Fails on id collision.
    pub fn insert(
        &mut self,
        plugin: Arc<dyn BotPlugin>,
        state: PluginState,
        last_error: Option<String>,
    ) -> PluginResult<()> {
        let id = plugin.info().id;
        if self.entries.contains_key(&id) {
            return Err(PluginError::DuplicateId { id });
        }

        let inserted = self.next_index;
        self.next_index += 1;
        let error_count = u32::from(state == PluginState::Error);
        self.entries.insert(
            id,
            PluginEntry {
                plugin,
                state,
                last_error,
                error_count,
                inserted,
            },
        );
        Ok(())
    }

    /// Remove a plugin from the registry; false when the id is unknown
    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn plugin_count(&self) -> usize {
        self.entries.len()
    }

    /// Lifecycle snapshot by id
    pub fn status(&self, id: &str) -> Option<PluginStatus> {
        self.entries.get(id).map(entry_status)
    }

    /// Lifecycle snapshot by display name
    pub fn status_by_name(&self, name: &str) -> Option<PluginStatus> {
        self.entries
            .values()
            .find(|entry| entry.plugin.info().name == name)
            .map(entry_status)
    }

    /// Mark a plugin active again, clearing any captured error
    pub fn enable(&mut self, id: &str) -> PluginResult<()> {
        let entry = self.entry_mut(id)?;
        entry.state = PluginState::Active;
        entry.last_error = None;
        Ok(())
    }

    /// Take a plugin out of the dispatch chain, with an optional reason
    pub fn disable(&mut self, id: &str, reason: Option<String>) -> PluginResult<()> {
        let entry = self.entry_mut(id)?;
        entry.state = PluginState::Disabled;
        entry.last_error = reason;
        Ok(())
    }

    /// Record a handler failure: state becomes `Error` with the message
    /// and the cumulative failure count grows by one
    pub fn mark_error(&mut self, id: &str, message: String) -> PluginResult<()> {
        let entry = self.entry_mut(id)?;
        entry.state = PluginState::Error;
        entry.last_error = Some(message);
        entry.error_count += 1;
        Ok(())
    }

    /// Active plugins in dispatch order, as (id, instance) pairs
    pub fn active_plugins(&self) -> Vec<(String, Arc<dyn BotPlugin>)> {
        let mut active: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.state == PluginState::Active)
            .collect();
        active.sort_by_key(|(_, entry)| (entry.plugin.info().priority, entry.inserted));
        active
            .into_iter()
            .map(|(id, entry)| (id.clone(), Arc::clone(&entry.plugin)))
            .collect()
    }

    /// Every registered plugin regardless of state, in dispatch order
    pub fn all_plugins(&self) -> Vec<PluginStatus> {
        let mut all: Vec<_> = self.entries.values().collect();
        all.sort_by_key(|entry| (entry.plugin.info().priority, entry.inserted));
        all.into_iter().map(|e| entry_status(e)).collect()
    }

    fn entry_mut(&mut self, id: &str) -> PluginResult<&mut PluginEntry> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| PluginError::NotFound { id: id.to_string() })
    }
}

fn entry_status(entry: &PluginEntry) -> PluginStatus {
    PluginStatus {
        info: entry.plugin.info(),
        state: entry.state,
        last_error: entry.last_error.clone(),
        error_count: entry.error_count,
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe shared plugin registry
#[derive(Debug, Clone)]
pub struct SharedPluginRegistry {
    inner: Arc<RwLock<PluginRegistry>>,
}

impl SharedPluginRegistry {
    /// Create a new shared plugin registry
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(PluginRegistry::new())),
        }
    }

    /// Get access to the inner registry for read/write operations
    pub fn inner(&self) -> &Arc<RwLock<PluginRegistry>> {
        &self.inner
    }

    /// Convenience method to check if a plugin exists
    pub async fn contains(&self, id: &str) -> bool {
        self.inner.read().await.contains(id)
    }

    /// Convenience method to get the plugin count
    pub async fn plugin_count(&self) -> usize {
        self.inner.read().await.plugin_count()
    }

    /// Convenience method to snapshot the active dispatch order
    pub async fn active_plugins(&self) -> Vec<(String, Arc<dyn BotPlugin>)> {
        self.inner.read().await.active_plugins()
    }

    /// Convenience method to snapshot every registered plugin
    pub async fn all_plugins(&self) -> Vec<PluginStatus> {
        self.inner.read().await.all_plugins()
    }

    /// Convenience method to record a handler failure
    pub async fn mark_error(&self, id: &str, message: String) -> PluginResult<()> {
        self.inner.write().await.mark_error(id, message)
    }
}

impl Default for SharedPluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
