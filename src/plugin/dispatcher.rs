//! Event Dispatcher
//!
//! Routes a normalized event through the active plugin chain in priority
//! order. The first plugin that reports "handled" ends the traversal. A
//! handler failure marks that plugin's state as `Error` and the traversal
//! continues: one broken plugin never blocks the rest of the chain or
//! future events.
//!
//! The active list is snapshotted under a read lock and the lock released
//! before any handler runs, so concurrent dispatches never serialize on
//! the registry and a registration mid-flight is simply not seen by
//! in-progress traversals.

use crate::event::api::Event;
use crate::plugin::registry::SharedPluginRegistry;
use crate::plugin::traits::BotPlugin;

pub struct Dispatcher {
    registry: SharedPluginRegistry,
}

impl Dispatcher {
    pub fn new(registry: SharedPluginRegistry) -> Self {
        Self { registry }
    }

    /// Dispatch an event; true when some plugin consumed it.
    ///
    /// An event nobody handles is a normal outcome, not an error.
    pub async fn dispatch(&self, event: &Event) -> bool {
        let active = self.registry.active_plugins().await;
        log::debug!(
            "dispatching {} event to {} active plugins",
            event.kind(),
            active.len()
        );

        for (id, plugin) in active {
            match invoke(plugin.as_ref(), event).await {
                Ok(true) => {
                    log::info!("{} event handled by plugin '{}'", event.kind(), id);
                    return true;
                }
                Ok(false) => {}
                Err(e) => {
                    log::error!(
                        "plugin '{}' failed on {} event, isolating: {}",
                        id,
                        event.kind(),
                        e
                    );
                    if let Err(mark_err) = self.registry.mark_error(&id, e.to_string()).await {
                        // The plugin was unregistered mid-dispatch
                        log::warn!("could not record error for '{}': {}", id, mark_err);
                    }
                }
            }
        }

        log::debug!("{} event not handled by any plugin", event.kind());
        false
    }
}

async fn invoke(
    plugin: &dyn BotPlugin,
    event: &Event,
) -> crate::plugin::error::PluginResult<bool> {
    match event {
        Event::Message(message) => plugin.handle_message(message).await,
        Event::Notice(notice) => plugin.handle_notice(notice).await,
        Event::Request(request) => plugin.handle_request(request).await,
    }
}
