//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "relaybot",
    version = crate::core::version::VERSION,
    about = "OneBot-compatible group bot runtime"
)]
pub struct Args {
    /// Path to the configuration file (default: config/relaybot.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format: text, ext, json
    #[arg(long, default_value = "text")]
    pub log_format: String,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Disable colored terminal output
    #[arg(long)]
    pub no_color: bool,
}
