//! Interceptor behaviour for each supported send method.

use crate::helpers::{SpyApi, upload};
use chat_action::{ApiRequest, AutoChatAction, BotApi, ChatAction, InputMedia, MediaKind};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const CHAT: i64 = 1;

/// Send `request` through a fresh wrapper and return the spy's calls.
async fn dispatch(request: ApiRequest) -> Vec<crate::helpers::Call> {
    let api = Arc::new(SpyApi::new());
    let auto = AutoChatAction::new(Arc::clone(&api));
    auto.call(request, Some(CancellationToken::new()))
        .await
        .unwrap();
    assert_eq!(auto.controller().active_count(), 0);
    api.calls()
}

async fn assert_chat_action(request: ApiRequest, expected: ChatAction) {
    let calls = dispatch(request.clone()).await;
    assert_eq!(calls.len(), 2, "{} should add one chat action", request.method());
    assert_eq!(
        calls[0].request,
        ApiRequest::send_chat_action(CHAT, expected, None)
    );
    assert_eq!(calls[1].request, request);
    assert!(calls.iter().all(|call| call.signalled));
}

async fn assert_passed_through(request: ApiRequest) {
    let calls = dispatch(request.clone()).await;
    assert_eq!(calls.len(), 1, "{} should pass through", request.method());
    assert_eq!(calls[0].request, request);
}

#[tokio::test(start_paused = true)]
async fn uploaded_media_sends_matching_chat_action() {
    let cases = [
        (ApiRequest::send_photo(CHAT, upload()), ChatAction::UploadPhoto),
        (
            ApiRequest::send_audio(CHAT, upload(), None),
            ChatAction::UploadDocument,
        ),
        (
            ApiRequest::send_document(CHAT, upload(), None),
            ChatAction::UploadDocument,
        ),
        (
            ApiRequest::send_video(CHAT, upload(), None),
            ChatAction::UploadVideo,
        ),
        (
            ApiRequest::send_animation(CHAT, upload(), None),
            ChatAction::UploadVideo,
        ),
        (ApiRequest::send_voice(CHAT, upload()), ChatAction::UploadVoice),
        (
            ApiRequest::send_video_note(CHAT, upload(), None),
            ChatAction::UploadVideoNote,
        ),
        (
            ApiRequest::send_sticker(CHAT, upload()),
            ChatAction::ChooseSticker,
        ),
    ];
    for (request, expected) in cases {
        assert_chat_action(request, expected).await;
    }
}

#[tokio::test(start_paused = true)]
async fn uploaded_thumbnail_alone_sends_chat_action() {
    let cases = [
        (
            ApiRequest::send_audio(CHAT, "file_id", Some(upload())),
            ChatAction::UploadDocument,
        ),
        (
            ApiRequest::send_document(CHAT, "file_id", Some(upload())),
            ChatAction::UploadDocument,
        ),
        (
            ApiRequest::send_video(CHAT, "file_id", Some(upload())),
            ChatAction::UploadVideo,
        ),
        (
            ApiRequest::send_animation(CHAT, "file_id", Some(upload())),
            ChatAction::UploadVideo,
        ),
        (
            ApiRequest::send_video_note(CHAT, "file_id", Some(upload())),
            ChatAction::UploadVideoNote,
        ),
    ];
    for (request, expected) in cases {
        assert_chat_action(request, expected).await;
    }
}

#[tokio::test(start_paused = true)]
async fn referenced_media_is_passed_through() {
    let cases = [
        ApiRequest::send_photo(CHAT, "file_id"),
        ApiRequest::send_audio(CHAT, "file_id", Some("thumb_id".into())),
        ApiRequest::send_document(CHAT, "https://example.com/a.pdf", None),
        ApiRequest::send_video(CHAT, "file_id", None),
        ApiRequest::send_animation(CHAT, "file_id", None),
        ApiRequest::send_voice(CHAT, "file_id"),
        ApiRequest::send_video_note(CHAT, "file_id", None),
        ApiRequest::send_sticker(CHAT, "file_id"),
        ApiRequest::send_media_group(
            CHAT,
            vec![
                InputMedia::new(MediaKind::Photo, "file_id"),
                InputMedia::new(MediaKind::Video, "file_id"),
            ],
        ),
    ];
    for request in cases {
        assert_passed_through(request).await;
    }
}

#[tokio::test(start_paused = true)]
async fn text_and_location_always_send_chat_action() {
    assert_chat_action(ApiRequest::send_message(CHAT, "hello"), ChatAction::Typing).await;
    assert_chat_action(
        ApiRequest::send_location(CHAT, 51.5, -0.12),
        ChatAction::FindLocation,
    )
    .await;
}

#[tokio::test(start_paused = true)]
async fn unrelated_methods_are_passed_through() {
    assert_passed_through(ApiRequest::other("getMe", serde_json::json!({}))).await;
    assert_passed_through(ApiRequest::other(
        "editMessageText",
        serde_json::json!({ "chat_id": CHAT, "message_id": 3, "text": "edited" }),
    ))
    .await;
    assert_passed_through(ApiRequest::send_chat_action(CHAT, ChatAction::Typing, None)).await;
}

#[tokio::test(start_paused = true)]
async fn message_thread_id_is_forwarded() {
    let request = ApiRequest::send_photo(CHAT, upload()).in_thread(1337);
    let calls = dispatch(request.clone()).await;

    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].request,
        ApiRequest::send_chat_action(CHAT, ChatAction::UploadPhoto, Some(1337))
    );
    assert_eq!(calls[1].request, request);
}

#[tokio::test(start_paused = true)]
async fn username_chat_ids_are_supported() {
    let request = ApiRequest::send_message("@channel", "hello");
    let calls = dispatch(request.clone()).await;

    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].request,
        ApiRequest::send_chat_action("@channel", ChatAction::Typing, None)
    );
}

#[tokio::test(start_paused = true)]
async fn unusable_chat_id_is_passed_through() {
    let api = Arc::new(SpyApi::new());
    let auto = AutoChatAction::new(Arc::clone(&api));
    let request = ApiRequest::send_message("  ", "hello");

    auto.call(request.clone(), None).await.unwrap();

    assert_eq!(auto.controller().active_count(), 0);
    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].request, request);
}
