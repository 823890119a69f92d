//! Type definitions for the plugin system

/// Plugin identity and dispatch priority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    /// Unique id, used for registry lookups and the disabled-plugins config
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Dispatch priority: lower values run first, ties break by
    /// registration order
    pub priority: i32,
}

/// Plugin lifecycle state
///
/// `Error` is entered when setup fails at registration or a handler fails
/// at dispatch; the plugin stays registered but drops out of the active
/// chain until explicitly re-enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Active,
    Disabled,
    Error,
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginState::Active => write!(f, "active"),
            PluginState::Disabled => write!(f, "disabled"),
            PluginState::Error => write!(f, "error"),
        }
    }
}

/// Snapshot of a registered plugin's identity and lifecycle
#[derive(Debug, Clone)]
pub struct PluginStatus {
    pub info: PluginInfo,
    pub state: PluginState,
    /// Captured failure message, present only in the `Error` state or when
    /// a disable carried a reason
    pub last_error: Option<String>,
    /// Cumulative handler/setup failures; survives enable cycles
    pub error_count: u32,
}
