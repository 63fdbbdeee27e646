//! Bot API wrapper that shows chat actions while requests are in flight.
//!
//! [`AutoChatAction`] sits in front of any [`BotApi`]. For each request that
//! implies a chat action it starts a schedule for the target chat, performs
//! the call, and stops the schedule once the call settles or is dropped
//! mid-flight.

use crate::api::{ApiChatActionSender, BotApi};
use crate::config::ChatActionConfig;
use crate::controller::{ChatActionsController, StopGuard};
use crate::extract::chat_actions_for_request;
use crate::request::ApiRequest;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct AutoChatAction<A: ?Sized> {
    inner: Arc<A>,
    controller: ChatActionsController,
    enabled: bool,
}

impl<A: BotApi + ?Sized + 'static> AutoChatAction<A> {
    /// Wrap `inner`. Chat actions are emitted through `inner` directly so
    /// they never pass through this wrapper again.
    pub fn new(inner: Arc<A>) -> Self {
        let sender = Arc::new(ApiChatActionSender::new(Arc::clone(&inner)));
        Self {
            inner,
            controller: ChatActionsController::new(sender),
            enabled: true,
        }
    }

    /// Wrap `inner` using settings from `config`.
    pub fn from_config(inner: Arc<A>, config: &ChatActionConfig) -> Self {
        let sender = Arc::new(ApiChatActionSender::new(Arc::clone(&inner)));
        Self {
            inner,
            controller: config.build_controller(sender),
            enabled: config.auto_chat_action,
        }
    }

    /// Wrap `inner` with an existing controller, e.g. one shared with the
    /// turn contexts of the same bot.
    pub fn with_controller(inner: Arc<A>, controller: ChatActionsController) -> Self {
        Self {
            inner,
            controller,
            enabled: true,
        }
    }
}

impl<A: ?Sized> AutoChatAction<A> {
    pub fn controller(&self) -> &ChatActionsController {
        &self.controller
    }

    pub fn inner(&self) -> &Arc<A> {
        &self.inner
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start the request's chat action, if it has one, and wait until the
    /// first action is on its way. The returned guard is armed before the
    /// wait so a dropped call still stops the schedule.
    async fn begin(
        &self,
        request: &ApiRequest,
        signal: Option<&CancellationToken>,
    ) -> Option<StopGuard> {
        let plan = chat_actions_for_request(request);
        if !plan.is_required() {
            return None;
        }
        let Some(key) = request.sending_key() else {
            debug!(
                method = request.method(),
                "request has no usable chat id; no chat action"
            );
            return None;
        };

        let guard = self.controller.stop_guard(key.clone());
        self.controller
            .start_sending_dispatched(key, plan.into_actions(), signal.cloned())
            .await;
        Some(guard)
    }
}

#[async_trait]
impl<A: BotApi + ?Sized + 'static> BotApi for AutoChatAction<A> {
    async fn call(
        &self,
        request: ApiRequest,
        signal: Option<CancellationToken>,
    ) -> anyhow::Result<serde_json::Value> {
        let _sending = if self.enabled {
            self.begin(&request, signal.as_ref()).await
        } else {
            None
        };
        self.inner.call(request, signal).await
    }
}
