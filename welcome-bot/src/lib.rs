//! # welcome-bot
//!
//! Greets members joining a conversation and answers a handful of fixed utterances
//! (`hello`/`hi`, `intro`/`help`), keeping a small per-user record in [`wbot_core::UserState`].
//!
//! - [`bot`] – [`WelcomeUserBot`], the activity handler
//! - [`cards`] – intro hero card
//! - [`state`] – [`WelcomeUserState`] record
//! - [`config`] – [`BotConfig`] loaded from env
//! - [`runner`] – storage selection and pipeline wiring

pub mod bot;
pub mod cards;
pub mod config;
pub mod runner;
pub mod state;

pub use bot::WelcomeUserBot;
pub use config::{BotConfig, BotMessages};
pub use runner::{build_pipeline, build_storage};
pub use state::{WelcomeUserState, WELCOME_USER_STATE_PROPERTY};
