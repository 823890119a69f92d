//! Echo plugin
//!
//! Replies `/echo <text>` with the text, in the chat it came from. Mostly
//! useful as an end-to-end check of the dispatch chain and the outbound
//! path.

use std::sync::Arc;

use crate::event::api::{MessageEvent, MessageScope};
use crate::gateway::api::MessageTarget;
use crate::plugin::context::BotContext;
use crate::plugin::error::PluginResult;
use crate::plugin::traits::BotPlugin;
use crate::plugin::types::PluginInfo;

pub struct EchoPlugin {
    ctx: Arc<BotContext>,
}

impl EchoPlugin {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait::async_trait]
impl BotPlugin for EchoPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            id: "echo".to_string(),
            name: "Echo".to_string(),
            priority: 50,
        }
    }

    async fn handle_message(&self, event: &MessageEvent) -> PluginResult<bool> {
        if event.command.as_deref() != Some("echo") {
            return Ok(false);
        }
        let text = event.command_args();
        if text.is_empty() {
            // A bare "/echo" is left for someone else
            return Ok(false);
        }

        let target = match event.scope {
            MessageScope::Group { group_id } => MessageTarget::Group(group_id),
            MessageScope::Private => MessageTarget::Private(event.user_id),
        };
        if let Err(e) = self.ctx.gateway.send_msg(target, &text).await {
            log::warn!("echo reply failed: {}", e);
        }
        Ok(true)
    }
}
