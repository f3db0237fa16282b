//! # wbot-core
//!
//! Core types and traits for turn processing: the [`Activity`] schema and hero cards,
//! the outbound [`ChannelSender`], the per-turn [`TurnContext`], user state with typed
//! [`StatePropertyAccessor`]s, the [`ActivityHandler`] trait and its [`dispatch`] function,
//! and tracing initialization. Transport-agnostic; used by turn-pipeline and welcome-bot.

pub mod activity;
pub mod bot;
pub mod card;
pub mod context;
pub mod error;
pub mod handler;
pub mod logger;
pub mod state;

pub use activity::{
    activity_types, Activity, ActivityKind, ChannelAccount, ConversationAccount, ConversationKey,
};
pub use bot::{ChannelSender, ResourceResponse, TranscriptSender};
pub use card::{ActionType, Attachment, CardAction, HeroCard, HERO_CARD_CONTENT_TYPE};
pub use context::TurnContext;
pub use error::{DispatchError, HandlerError, HandlerResult, SendError, StateStoreError, TurnError};
pub use handler::{dispatch, ActivityHandler};
pub use logger::{init_tracing, open_log_file, LogOutput};
pub use state::{StatePropertyAccessor, UserState};
