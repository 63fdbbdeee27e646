//! Transport contracts the chat action layer sits between.

use crate::action::ChatAction;
use crate::request::{ApiRequest, SendingKey};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Outbound bot API dispatch. Implementations perform the network call.
///
/// `signal` is the caller's cancellation token; transports should abort the
/// in-flight call once it fires.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn call(
        &self,
        request: ApiRequest,
        signal: Option<CancellationToken>,
    ) -> anyhow::Result<serde_json::Value>;
}

#[async_trait]
impl<A: BotApi + ?Sized> BotApi for Arc<A> {
    async fn call(
        &self,
        request: ApiRequest,
        signal: Option<CancellationToken>,
    ) -> anyhow::Result<serde_json::Value> {
        (**self).call(request, signal).await
    }
}

/// Best-effort delivery of one chat action to a conversation.
#[async_trait]
pub trait ChatActionSender: Send + Sync {
    async fn send_chat_action(
        &self,
        key: &SendingKey,
        action: ChatAction,
        signal: Option<&CancellationToken>,
    ) -> anyhow::Result<()>;
}

/// Sends chat actions as `sendChatAction` calls on a [`BotApi`].
pub struct ApiChatActionSender<A: ?Sized> {
    api: Arc<A>,
}

impl<A: BotApi + ?Sized> ApiChatActionSender<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: BotApi + ?Sized> ChatActionSender for ApiChatActionSender<A> {
    async fn send_chat_action(
        &self,
        key: &SendingKey,
        action: ChatAction,
        signal: Option<&CancellationToken>,
    ) -> anyhow::Result<()> {
        let request =
            ApiRequest::send_chat_action(key.chat_id.clone(), action, key.message_thread_id);
        self.api.call(request, signal.cloned()).await?;
        Ok(())
    }
}
