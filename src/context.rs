//! Per-turn chat action state for update handlers.
//!
//! A [`TurnContext`] lives for the handling of one incoming update. Handlers
//! set the chat action they want shown while they work; the context turns
//! each assignment into a start or stop on the shared controller, keyed by
//! the chat (and forum topic) the update came from.

use crate::action::ChatAction;
use crate::api::BotApi;
use crate::controller::ChatActionsController;
use crate::error::{ChatActionError, Result};
use crate::request::{ChatId, SendingKey};
use crate::transformer::AutoChatAction;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

#[derive(Default)]
struct TurnState {
    chat: Option<SendingKey>,
    controller: OnceLock<ChatActionsController>,
    chat_action: Mutex<Option<ChatAction>>,
    finished: AtomicBool,
}

impl TurnState {
    fn lock_chat_action(&self) -> MutexGuard<'_, Option<ChatAction>> {
        self.chat_action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Chat action state of one update. Clones share the same state.
#[derive(Clone, Default)]
pub struct TurnContext {
    state: Arc<TurnState>,
}

impl TurnContext {
    /// Context for an update from `chat`, or from no chat at all.
    pub fn new(chat: Option<SendingKey>) -> Self {
        Self {
            state: Arc::new(TurnState {
                chat,
                ..TurnState::default()
            }),
        }
    }

    pub fn for_chat(chat_id: impl Into<ChatId>) -> Self {
        Self::new(Some(SendingKey::chat(chat_id)))
    }

    /// Context for a message posted in a forum topic.
    pub fn for_thread(chat_id: impl Into<ChatId>, message_thread_id: i64) -> Self {
        Self::new(Some(SendingKey::new(chat_id, Some(message_thread_id))))
    }

    pub fn chat(&self) -> Option<&SendingKey> {
        self.state.chat.as_ref()
    }

    /// Attach the controller. Only the first installation takes effect;
    /// returns whether this call installed it.
    pub fn install(&self, controller: &ChatActionsController) -> bool {
        self.state.controller.set(controller.clone()).is_ok()
    }

    pub fn is_installed(&self) -> bool {
        self.state.controller.get().is_some()
    }

    /// The most recently assigned chat action. Independent of whether the
    /// schedule behind it is still running.
    ///
    /// # Errors
    ///
    /// Returns [`ChatActionError::NotInstalled`] if no controller has been
    /// installed on this context.
    pub fn chat_action(&self) -> Result<Option<ChatAction>> {
        self.controller()?;
        Ok(*self.state.lock_chat_action())
    }

    /// Show `action` in the current chat until replaced or cleared.
    ///
    /// Once the turn has finished the value is still recorded, but no
    /// schedule is started or stopped.
    ///
    /// # Errors
    ///
    /// Returns [`ChatActionError::NotInstalled`] if no controller has been
    /// installed on this context.
    pub fn set_chat_action(&self, action: Option<ChatAction>) -> Result<()> {
        let controller = self.controller()?;

        // Held across the controller call so `finish` cannot slip in between.
        let mut current = self.state.lock_chat_action();
        *current = action;

        if self.state.finished.load(Ordering::SeqCst) {
            debug!(action = ?action, "turn already finished; chat action only recorded");
            return Ok(());
        }
        let Some(key) = self.state.chat.as_ref() else {
            debug!(action = ?action, "update has no chat; chat action only recorded");
            return Ok(());
        };

        match action {
            Some(action) => {
                controller.start_sending(key.clone(), vec![action], None);
            }
            None => {
                controller.stop_sending(key);
            }
        }
        Ok(())
    }

    /// Stop the turn's schedule. Only the first call has any effect.
    pub fn finish(&self) -> bool {
        let _current = self.state.lock_chat_action();
        if self.state.finished.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let (Some(controller), Some(key)) = (self.state.controller.get(), &self.state.chat) {
            controller.stop_sending(key);
        }
        true
    }

    fn controller(&self) -> Result<&ChatActionsController> {
        self.state
            .controller
            .get()
            .ok_or(ChatActionError::NotInstalled)
    }
}

struct FinishOnDrop(TurnContext);

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// Run `handler` for one update with `controller` installed on `ctx`.
///
/// The turn's chat action is stopped once the handler returns, fails,
/// panics or is dropped.
pub async fn run_turn<F, Fut, T>(
    controller: &ChatActionsController,
    ctx: TurnContext,
    handler: F,
) -> T
where
    F: FnOnce(TurnContext) -> Fut,
    Fut: Future<Output = T>,
{
    ctx.install(controller);
    let _finish = FinishOnDrop(ctx.clone());
    handler(ctx).await
}

impl<A: BotApi + ?Sized + 'static> AutoChatAction<A> {
    /// Run an update handler sharing this wrapper's controller.
    pub async fn run_turn<F, Fut, T>(&self, ctx: TurnContext, handler: F) -> T
    where
        F: FnOnce(TurnContext) -> Fut,
        Fut: Future<Output = T>,
    {
        run_turn(self.controller(), ctx, handler).await
    }
}
