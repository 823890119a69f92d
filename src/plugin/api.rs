//! Public API for the plugin system
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Core plugin management
pub use crate::plugin::dispatcher::Dispatcher;
pub use crate::plugin::manager::PluginManager;

// Error handling
pub use crate::plugin::error::{PluginError, PluginResult};

// Plugin contract and context
pub use crate::plugin::context::BotContext;
pub use crate::plugin::traits::BotPlugin;

// Plugin metadata and lifecycle state
pub use crate::plugin::types::{PluginInfo, PluginState, PluginStatus};

// Plugin registry for management
pub use crate::plugin::registry::{PluginRegistry, SharedPluginRegistry};
