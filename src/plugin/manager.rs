//! Plugin Manager
//!
//! Central coordinator for plugin lifecycle. Owns the registry and runs
//! plugin setup at registration: a plugin whose setup fails is kept
//! registered in the `Error` state so it stays visible to operators, but
//! never enters the dispatch chain.

use std::sync::Arc;

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::registry::SharedPluginRegistry;
use crate::plugin::traits::BotPlugin;
use crate::plugin::types::{PluginState, PluginStatus};

pub struct PluginManager {
    /// The plugin registry (owned by this manager)
    registry: SharedPluginRegistry,
}

impl PluginManager {
    /// Create a new plugin manager
    pub fn new() -> Self {
        Self {
            registry: SharedPluginRegistry::new(),
        }
    }

    /// Get shared access to the plugin registry
    pub fn registry(&self) -> &SharedPluginRegistry {
        &self.registry
    }

    /// Register a plugin, running its setup.
    ///
    /// Setup failure does not fail registration: the plugin lands in the
    /// `Error` state with the captured message. Only an id collision is an
    /// error here.
    pub async fn register(&self, mut plugin: Box<dyn BotPlugin>) -> PluginResult<()> {
        let info = plugin.info();
        if self.registry.contains(&info.id).await {
            return Err(PluginError::DuplicateId { id: info.id });
        }

        let (state, last_error) = match plugin.setup().await {
            Ok(()) => (PluginState::Active, None),
            Err(e) => {
                log::error!("plugin '{}' setup failed: {}", info.id, e);
                (PluginState::Error, Some(e.to_string()))
            }
        };

        let mut registry = self.registry.inner().write().await;
        registry.insert(Arc::from(plugin), state, last_error)?;
        log::info!(
            "plugin '{}' ({}) registered, priority {}, state {}",
            info.id,
            info.name,
            info.priority,
            state
        );
        Ok(())
    }

    /// Remove a plugin from the dispatch order; false when the id is unknown
    pub async fn unregister(&self, id: &str) -> bool {
        let removed = self.registry.inner().write().await.remove(id);
        if removed {
            log::info!("plugin '{}' unregistered", id);
        }
        removed
    }

    /// Put a plugin back into the dispatch chain
    pub async fn enable(&self, id: &str) -> PluginResult<()> {
        self.registry.inner().write().await.enable(id)?;
        log::info!("plugin '{}' enabled", id);
        Ok(())
    }

    /// Take a plugin out of the dispatch chain without unregistering it
    pub async fn disable(&self, id: &str, reason: Option<String>) -> PluginResult<()> {
        self.registry
            .inner()
            .write()
            .await
            .disable(id, reason.clone())?;
        log::info!(
            "plugin '{}' disabled: {}",
            id,
            reason.as_deref().unwrap_or("no reason given")
        );
        Ok(())
    }

    /// Lifecycle snapshot by id
    pub async fn get_by_id(&self, id: &str) -> Option<PluginStatus> {
        self.registry.inner().read().await.status(id)
    }

    /// Lifecycle snapshot by display name
    pub async fn get_by_name(&self, name: &str) -> Option<PluginStatus> {
        self.registry.inner().read().await.status_by_name(name)
    }

    /// Active plugins in dispatch order
    pub async fn active_plugins(&self) -> Vec<(String, Arc<dyn BotPlugin>)> {
        self.registry.active_plugins().await
    }

    /// Every registered plugin regardless of state, in dispatch order
    pub async fn all_plugins(&self) -> Vec<PluginStatus> {
        self.registry.all_plugins().await
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
