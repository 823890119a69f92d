//! Build metadata shared across app and plugins.

/// Crate version as published
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-agent string sent on outbound gateway calls
pub fn user_agent() -> String {
    format!("relaybot/{}", VERSION)
}
