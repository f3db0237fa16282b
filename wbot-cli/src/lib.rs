//! # wbot-cli
//!
//! Console host for the welcome bot: argument parsing, config loading, and a stdin/stdout
//! channel that feeds one activity per line into the turn pipeline.

pub mod cli;
pub mod console;

pub use cli::{load_config, Cli, Commands};
pub use console::{render_activity, run_console, ConsoleSender, ConsoleSession};
pub use welcome_bot::BotConfig;
