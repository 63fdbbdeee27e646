//! Dispatch order with the real timer driver, on both runtime flavors.

use crate::helpers::{SpyApi, upload};
use chat_action::{ApiRequest, AutoChatAction, BotApi};
use std::sync::Arc;
use std::time::Duration;

async fn assert_chat_action_goes_first(latency: Duration, runs: usize) {
    for run in 0..runs {
        let api = Arc::new(SpyApi::new().with_call_latency(latency));
        let auto = AutoChatAction::new(Arc::clone(&api));

        auto.call(ApiRequest::send_photo(1, upload()), None)
            .await
            .unwrap();

        assert_eq!(
            api.methods(),
            vec!["sendChatAction", "sendPhoto"],
            "run {run}"
        );
        assert_eq!(auto.controller().active_count(), 0);
    }
}

#[tokio::test(flavor = "current_thread")]
async fn chat_action_precedes_request_on_current_thread() {
    assert_chat_action_goes_first(Duration::ZERO, 50).await;
    assert_chat_action_goes_first(Duration::from_millis(20), 5).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn chat_action_precedes_request_on_multi_thread() {
    assert_chat_action_goes_first(Duration::ZERO, 200).await;
    assert_chat_action_goes_first(Duration::from_millis(20), 20).await;
}
