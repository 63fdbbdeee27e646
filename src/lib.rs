//! Chat-action: automatic "typing…" / "uploading…" indicators for bot API clients.
//!
//! While a bot performs a slow operation (uploading a video, generating a
//! reply) the chat shows a transient activity indicator that disappears
//! after a few seconds unless it is sent again. This crate keeps those
//! indicators alive on a schedule.
//!
//! # Architecture
//!
//! - **Controller**: one repeating schedule per chat (and forum topic),
//!   rotating through its actions every [`DEFAULT_REPEAT_INTERVAL`]
//! - **Classifier**: maps an outgoing [`ApiRequest`] to the actions it implies
//! - **Interceptor**: [`AutoChatAction`] wraps any [`BotApi`] and drives the
//!   controller around each request
//! - **Turn context**: [`TurnContext`] lets an update handler set the
//!   current chat action by assignment

pub mod action;
pub mod api;
pub mod config;
pub mod context;
pub mod controller;
pub mod cycle;
pub mod error;
pub mod extract;
pub mod request;
pub mod transformer;


pub use action::ChatAction;
pub use api::{ApiChatActionSender, BotApi, ChatActionSender};
pub use config::ChatActionConfig;
pub use context::{TurnContext, run_turn};
pub use controller::{ChatActionsController, DEFAULT_REPEAT_INTERVAL, SendingId, StopGuard};
pub use cycle::ActionCycle;
pub use error::{ChatActionError, Result};
pub use extract::{ChatActionPlan, chat_actions_for_request};
pub use request::{ApiRequest, ChatId, InputFile, InputFileRef, InputMedia, MediaKind, SendingKey};
pub use transformer::AutoChatAction;
