//! Schedule lifecycle properties of the controller.

use crate::helpers::{SpyApi, controller_over, settle};
use chat_action::{ActionCycle, ChatAction, SendingKey};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn rotation_returns_position_modulo_length() {
    let lists: [&[ChatAction]; 3] = [
        &[ChatAction::Typing],
        &[ChatAction::UploadPhoto, ChatAction::UploadVideo],
        &[
            ChatAction::UploadDocument,
            ChatAction::UploadVideo,
            ChatAction::UploadDocument,
            ChatAction::UploadPhoto,
        ],
    ];
    for list in lists {
        let drawn: Vec<_> = ActionCycle::new(list.to_vec())
            .take(list.len() * 5)
            .collect();
        for (n, action) in drawn.iter().enumerate() {
            assert_eq!(*action, list[n % list.len()], "draw {n} of {list:?}");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn first_emission_is_first_action() {
    let api = Arc::new(SpyApi::new());
    let controller = controller_over(&api);

    controller.start_sending(
        SendingKey::chat(1),
        vec![ChatAction::RecordVideo, ChatAction::Typing],
        None,
    );
    settle().await;

    assert_eq!(api.chat_actions(), vec![(0, ChatAction::RecordVideo)]);
}

#[tokio::test(start_paused = true)]
async fn double_start_leaves_one_timer() {
    let api = Arc::new(SpyApi::new());
    let controller = controller_over(&api);
    let key = SendingKey::chat(1);

    controller.start_sending(key.clone(), vec![ChatAction::Typing], None);
    controller.start_sending(key.clone(), vec![ChatAction::Typing], None);
    settle().await;
    tokio::time::sleep(Duration::from_millis(5500)).await;

    let at_five = api
        .chat_actions()
        .into_iter()
        .filter(|(secs, _)| *secs == 5)
        .count();
    assert_eq!(at_five, 1);
    assert_eq!(controller.active_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn failing_chat_stops_while_others_continue() {
    let api = Arc::new(SpyApi::new());
    api.fail_chat_action_for(1, 2);
    let controller = controller_over(&api);

    controller.start_sending(SendingKey::chat(1), vec![ChatAction::Typing], None);
    controller.start_sending(SendingKey::chat(2), vec![ChatAction::Typing], None);
    settle().await;
    tokio::time::sleep(Duration::from_millis(16_500)).await;

    let secs = |actions: Vec<(u64, ChatAction)>| -> Vec<u64> {
        actions.into_iter().map(|(secs, _)| secs).collect()
    };
    assert_eq!(secs(api.chat_actions_for(1)), vec![0, 5]);
    assert_eq!(secs(api.chat_actions_for(2)), vec![0, 5, 10, 15]);
    assert!(!controller.is_sending(&SendingKey::chat(1)));
    assert!(controller.is_sending(&SendingKey::chat(2)));
}

#[tokio::test(start_paused = true)]
async fn threads_of_one_chat_are_independent() {
    let api = Arc::new(SpyApi::new());
    let controller = controller_over(&api);
    let general = SendingKey::chat(1);
    let topic = SendingKey::new(1, Some(7));

    controller.start_sending(general.clone(), vec![ChatAction::Typing], None);
    controller.start_sending(topic.clone(), vec![ChatAction::UploadPhoto], None);
    settle().await;
    assert_eq!(controller.active_count(), 2);

    controller.stop_sending(&general);
    tokio::time::sleep(Duration::from_millis(5500)).await;

    assert!(controller.is_sending(&topic));
    assert_eq!(
        api.chat_actions(),
        vec![
            (0, ChatAction::Typing),
            (0, ChatAction::UploadPhoto),
            (5, ChatAction::UploadPhoto),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn stop_all_silences_every_chat() {
    let api = Arc::new(SpyApi::new());
    let controller = controller_over(&api);

    for chat in 1..=3 {
        controller.start_sending(SendingKey::chat(chat), vec![ChatAction::Typing], None);
    }
    settle().await;
    controller.stop_all();
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(controller.active_count(), 0);
    assert_eq!(api.chat_actions().len(), 3);
}
