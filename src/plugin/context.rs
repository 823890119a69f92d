//! Bot context injected into plugins
//!
//! Plugins receive the context at construction time. The configuration is
//! an immutable snapshot; the gateway client is shared.

use std::sync::Arc;

use crate::core::config::BotConfig;
use crate::gateway::api::GatewayClient;

pub struct BotContext {
    pub config: Arc<BotConfig>,
    pub gateway: Arc<GatewayClient>,
}

impl BotContext {
    pub fn new(config: Arc<BotConfig>, gateway: Arc<GatewayClient>) -> Self {
        Self { config, gateway }
    }

    /// Command prefix from the configuration snapshot
    pub fn command_prefix(&self) -> &str {
        &self.config.bot.command_prefix
    }

    pub fn is_superuser(&self, user_id: i64) -> bool {
        self.config.bot.superusers.contains(&user_id)
    }
}
