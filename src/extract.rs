//! Decides which chat actions an outbound request implies.
//!
//! Text and location sends always imply their action. Media sends imply an
//! upload action only when they actually carry raw content (in the main field
//! or, where the method has one, in the thumbnail); sending a file id or URL
//! needs no indicator. Media groups yield one action per uploading item, in
//! item order.

use crate::action::ChatAction;
use crate::request::{ApiRequest, InputFileRef, InputMedia, MediaKind};

/// Ordered chat actions implied by one request.
///
/// Empty exactly when the request does not warrant an indicator. Duplicates
/// are meaningful: they weight the rotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatActionPlan {
    actions: Vec<ChatAction>,
}

impl ChatActionPlan {
    /// Whether the request warrants a chat action at all.
    pub fn is_required(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn actions(&self) -> &[ChatAction] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<ChatAction> {
        self.actions
    }
}

impl From<Vec<ChatAction>> for ChatActionPlan {
    fn from(actions: Vec<ChatAction>) -> Self {
        Self { actions }
    }
}

fn uploads(main: &InputFileRef, thumbnail: Option<&InputFileRef>) -> bool {
    main.is_upload() || thumbnail.is_some_and(InputFileRef::is_upload)
}

fn when(condition: bool, action: ChatAction) -> Vec<ChatAction> {
    if condition { vec![action] } else { Vec::new() }
}

fn media_group_action(item: &InputMedia) -> Option<ChatAction> {
    if !item.has_upload() {
        return None;
    }
    match item.kind {
        MediaKind::Audio | MediaKind::Document => Some(ChatAction::UploadDocument),
        MediaKind::Photo => Some(ChatAction::UploadPhoto),
        MediaKind::Video => Some(ChatAction::UploadVideo),
        // Not valid inside a media group.
        MediaKind::Animation | MediaKind::Unknown => None,
    }
}

/// Classify a request into the chat actions it implies.
pub fn chat_actions_for_request(request: &ApiRequest) -> ChatActionPlan {
    let actions = match request {
        ApiRequest::SendMessage { .. } => vec![ChatAction::Typing],
        ApiRequest::SendLocation { .. } => vec![ChatAction::FindLocation],
        ApiRequest::SendPhoto { photo, .. } => when(photo.is_upload(), ChatAction::UploadPhoto),
        ApiRequest::SendAudio {
            audio, thumbnail, ..
        } => when(
            uploads(audio, thumbnail.as_ref()),
            ChatAction::UploadDocument,
        ),
        ApiRequest::SendDocument {
            document,
            thumbnail,
            ..
        } => when(
            uploads(document, thumbnail.as_ref()),
            ChatAction::UploadDocument,
        ),
        ApiRequest::SendVideo {
            video, thumbnail, ..
        } => when(uploads(video, thumbnail.as_ref()), ChatAction::UploadVideo),
        ApiRequest::SendAnimation {
            animation,
            thumbnail,
            ..
        } => when(
            uploads(animation, thumbnail.as_ref()),
            ChatAction::UploadVideo,
        ),
        ApiRequest::SendVoice { voice, .. } => when(voice.is_upload(), ChatAction::UploadVoice),
        ApiRequest::SendVideoNote {
            video_note,
            thumbnail,
            ..
        } => when(
            uploads(video_note, thumbnail.as_ref()),
            ChatAction::UploadVideoNote,
        ),
        ApiRequest::SendSticker { sticker, .. } => {
            when(sticker.is_upload(), ChatAction::ChooseSticker)
        }
        ApiRequest::SendMediaGroup { media, .. } => {
            media.iter().filter_map(media_group_action).collect()
        }
        ApiRequest::SendChatAction { .. } | ApiRequest::Other { .. } => Vec::new(),
    };

    ChatActionPlan { actions }
}
