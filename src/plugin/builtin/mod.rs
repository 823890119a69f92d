//! Builtin plugins
//!
//! The registry is populated at process start from this static constructor
//! list; there is no dynamic discovery. The activity plugin carries the
//! lowest priority value so it observes every group message before any
//! command plugin can consume the event.

pub mod activity;
pub mod echo;

pub use activity::ActivityPlugin;
pub use echo::EchoPlugin;

use std::sync::Arc;

use crate::plugin::context::BotContext;
use crate::plugin::traits::BotPlugin;

/// Construct every builtin plugin against the given context.
pub fn default_plugins(ctx: &Arc<BotContext>) -> Vec<Box<dyn BotPlugin>> {
    vec![
        Box::new(ActivityPlugin::new(Arc::clone(ctx))),
        Box::new(EchoPlugin::new(Arc::clone(ctx))),
    ]
}
