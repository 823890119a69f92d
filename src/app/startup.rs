//! Application startup
//!
//! Wiring order: arguments → logging → configuration snapshot → gateway
//! client → plugin registration from the static builtin list → ingestion
//! server. Everything the core needs is built here once and injected; no
//! component reaches for global mutable state.

use clap::Parser;
use std::sync::Arc;

use crate::app::cli::Args;
use crate::core::config::BotConfig;
use crate::core::logging::init_logging;
use crate::core::version;
use crate::gateway::api::GatewayClient;
use crate::plugin::api::{BotContext, Dispatcher, PluginManager};
use crate::plugin::builtin;
use crate::server::api::{serve, AppState};

/// Process entry point; returns the exit code.
pub fn run() -> i32 {
    let args = Args::parse();

    let use_color = !args.no_color;
    if let Err(e) = init_logging(
        Some(&args.log_level),
        Some(&args.log_format),
        args.log_file.as_deref().and_then(|p| p.to_str()),
        use_color,
    ) {
        eprintln!("failed to initialize logging: {}", e);
        return 1;
    }

    log::info!("relaybot {} starting", version::VERSION);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("failed to build async runtime: {}", e);
            return 1;
        }
    };

    match runtime.block_on(run_bot(&args)) {
        Ok(()) => {
            log::info!("relaybot stopped");
            0
        }
        Err(e) => {
            log::error!("fatal: {}", e);
            1
        }
    }
}

async fn run_bot(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(BotConfig::load(args.config.as_deref())?);
    let gateway = Arc::new(GatewayClient::new(&config.gateway)?);
    let ctx = Arc::new(BotContext::new(Arc::clone(&config), gateway));

    let manager = PluginManager::new();
    register_builtins(&manager, &ctx, &config.plugins.disabled).await;
    log::info!(
        "{} of {} plugins active",
        manager.active_plugins().await.len(),
        manager.all_plugins().await.len()
    );

    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new(manager.registry().clone())),
        command_prefix: Arc::from(ctx.command_prefix()),
    };
    serve(&config.server, state).await?;
    Ok(())
}

/// Register the static builtin list, honoring the disabled-ids config.
async fn register_builtins(manager: &PluginManager, ctx: &Arc<BotContext>, disabled: &[String]) {
    for plugin in builtin::default_plugins(ctx) {
        let id = plugin.info().id;
        if let Err(e) = manager.register(plugin).await {
            // A duplicate in the builtin list is a programming error worth
            // surfacing loudly, but it must not take the bot down.
            log::error!("could not register plugin '{}': {}", id, e);
            continue;
        }
        if disabled.iter().any(|d| d == &id) {
            if let Err(e) = manager
                .disable(&id, Some("disabled by configuration".to_string()))
                .await
            {
                log::error!("could not disable plugin '{}': {}", id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GatewaySection;
    use crate::plugin::api::PluginState;

    fn test_ctx(config: BotConfig) -> Arc<BotContext> {
        let gateway = GatewaySection {
            base_url: "http://127.0.0.1:1".to_string(),
            token: String::new(),
            timeout_secs: 1,
        };
        Arc::new(BotContext::new(
            Arc::new(config),
            Arc::new(GatewayClient::new(&gateway).unwrap()),
        ))
    }

    #[tokio::test]
    async fn test_register_builtins_all_active() {
        let manager = PluginManager::new();
        let ctx = test_ctx(BotConfig::default());

        register_builtins(&manager, &ctx, &[]).await;

        let order: Vec<String> = manager
            .active_plugins()
            .await
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        // Activity runs first so it observes every message
        assert_eq!(order, vec!["activity", "echo"]);
    }

    #[tokio::test]
    async fn test_register_builtins_honors_disabled_list() {
        let manager = PluginManager::new();
        let ctx = test_ctx(BotConfig::default());

        register_builtins(&manager, &ctx, &["echo".to_string()]).await;

        let echo = manager.get_by_id("echo").await.unwrap();
        assert_eq!(echo.state, PluginState::Disabled);
        assert_eq!(
            echo.last_error.as_deref(),
            Some("disabled by configuration")
        );

        let order: Vec<String> = manager
            .active_plugins()
            .await
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(order, vec!["activity"]);
    }
}
