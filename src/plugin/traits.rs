//! Plugin Trait System
//!
//! Core contract every plugin implements. A plugin declares its identity
//! and priority via `info()`, gets one `setup()` call at registration, and
//! then receives events through the three handler entry points. Each
//! handler answers whether it consumed the event; `Ok(true)` stops the
//! dispatch chain.
//!
//! Handlers take `&self`: concurrent dispatches may run the same plugin in
//! parallel, so stateful plugins manage their own interior mutability.

use crate::event::api::{MessageEvent, NoticeEvent, RequestEvent};
use crate::plugin::error::PluginResult;
use crate::plugin::types::PluginInfo;

#[async_trait::async_trait]
pub trait BotPlugin: Send + Sync {
    /// Plugin identity and dispatch priority
    fn info(&self) -> PluginInfo;

    /// One-time initialization at registration. A failure here leaves the
    /// plugin registered but inert in the `Error` state.
    async fn setup(&mut self) -> PluginResult<()> {
        Ok(())
    }

    /// Handle a message event; return `Ok(true)` if consumed
    async fn handle_message(&self, _event: &MessageEvent) -> PluginResult<bool> {
        Ok(false)
    }

    /// Handle a notice event; return `Ok(true)` if consumed
    async fn handle_notice(&self, _event: &NoticeEvent) -> PluginResult<bool> {
        Ok(false)
    }

    /// Handle a request event; return `Ok(true)` if consumed
    async fn handle_request(&self, _event: &RequestEvent) -> PluginResult<bool> {
        Ok(false)
    }
}
