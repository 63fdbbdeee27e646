//! Demo binary that drives the chat action layer against a logging bot API.
//!
//! Nothing is sent over the network: every request is printed through
//! `tracing`, and uploads take a few seconds so the repeated indicators
//! are visible in the log.
//!
//! Usage: `chat-action-demo [config.toml]`

use async_trait::async_trait;
use chat_action::{
    ApiRequest, AutoChatAction, BotApi, ChatAction, ChatActionConfig, InputFile, TurnContext,
    chat_actions_for_request,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEMO_CHAT: i64 = 1;
const UPLOAD_DELAY: Duration = Duration::from_secs(7);
const STEP_DELAY: Duration = Duration::from_millis(1500);

/// Bot API stand-in that logs each request.
struct LoggingApi;

#[async_trait]
impl BotApi for LoggingApi {
    async fn call(
        &self,
        request: ApiRequest,
        _signal: Option<CancellationToken>,
    ) -> anyhow::Result<serde_json::Value> {
        match &request {
            ApiRequest::SendChatAction {
                chat_id,
                message_thread_id,
                action,
            } => {
                tracing::info!(%chat_id, thread_id = ?message_thread_id, %action, "sendChatAction");
            }
            other => {
                tracing::info!(method = other.method(), "request started");
                let uploads = chat_actions_for_request(other)
                    .actions()
                    .iter()
                    .any(|action| action.as_str().starts_with("upload_"));
                if uploads {
                    tokio::time::sleep(UPLOAD_DELAY).await;
                }
                tracing::info!(method = other.method(), "request finished");
            }
        }
        Ok(serde_json::Value::Bool(true))
    }
}

fn load_config() -> anyhow::Result<ChatActionConfig> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(ChatActionConfig::default_config_path);

    if path.exists() {
        tracing::info!(path = %path.display(), "loading config");
        Ok(ChatActionConfig::from_file(&path)?)
    } else {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        Ok(ChatActionConfig::default())
    }
}

async fn run() -> anyhow::Result<()> {
    let config = load_config()?;
    let bot = AutoChatAction::from_config(Arc::new(LoggingApi), &config);

    // An update handler that switches indicators while it works.
    bot.run_turn(TurnContext::for_chat(DEMO_CHAT), |ctx| async move {
        for action in [
            ChatAction::UploadPhoto,
            ChatAction::UploadVideo,
            ChatAction::ChooseSticker,
            ChatAction::Typing,
        ] {
            ctx.set_chat_action(Some(action))?;
            tokio::time::sleep(STEP_DELAY).await;
        }
        anyhow::Ok(())
    })
    .await?;

    bot.call(ApiRequest::send_message(DEMO_CHAT, "Here you go"), None)
        .await?;

    // A raw upload keeps "sending photo" visible until the request settles.
    bot.call(
        ApiRequest::send_photo(DEMO_CHAT, InputFile::new(vec![0u8; 64]).with_file_name("cat.jpg")),
        None,
    )
    .await?;

    bot.controller().shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("chat-action-demo starting");

    run().await.map_err(|e| {
        tracing::error!(error = %e, "chat-action-demo exited with error");
        anyhow::anyhow!("chat-action-demo failed: {e}")
    })?;

    tracing::info!("chat-action-demo finished");
    Ok(())
}
