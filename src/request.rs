//! Outbound bot API requests as seen by the chat action layer.
//!
//! Only the methods that can imply a chat action get their own variant; all
//! other calls travel as [`ApiRequest::Other`] with a raw JSON payload.

use crate::action::ChatAction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target conversation: numeric id or `@username`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl ChatId {
    /// Whether this id can address a conversation at all.
    pub fn is_usable(&self) -> bool {
        match self {
            Self::Id(_) => true,
            Self::Username(name) => !name.trim().is_empty(),
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(Self::Id),
            serde_json::Value::String(s) => Some(Self::Username(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(name: &str) -> Self {
        Self::Username(name.to_owned())
    }
}

impl From<String> for ChatId {
    fn from(name: String) -> Self {
        Self::Username(name)
    }
}

/// Identifies one independent chat action schedule: a chat plus an optional
/// forum topic. A missing thread is a distinct key from every thread id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SendingKey {
    pub chat_id: ChatId,
    pub message_thread_id: Option<i64>,
}

impl SendingKey {
    pub fn new(chat_id: impl Into<ChatId>, message_thread_id: Option<i64>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message_thread_id,
        }
    }

    pub fn chat(chat_id: impl Into<ChatId>) -> Self {
        Self::new(chat_id, None)
    }
}

impl fmt::Display for SendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message_thread_id {
            Some(thread) => write!(f, "{}:{thread}", self.chat_id),
            None => write!(f, "{}", self.chat_id),
        }
    }
}

/// Raw file content to be uploaded with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub data: Vec<u8>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl InputFile {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// Content field of a media request: either a fresh upload or a reference
/// (file id or URL) to content the server already has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputFileRef {
    Reference(String),
    Upload(InputFile),
}

impl InputFileRef {
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload(_))
    }
}

impl From<InputFile> for InputFileRef {
    fn from(file: InputFile) -> Self {
        Self::Upload(file)
    }
}

impl From<&str> for InputFileRef {
    fn from(reference: &str) -> Self {
        Self::Reference(reference.to_owned())
    }
}

impl From<String> for InputFileRef {
    fn from(reference: String) -> Self {
        Self::Reference(reference)
    }
}

/// Type tag of a media group item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Document,
    Photo,
    Video,
    Animation,
    #[serde(other)]
    Unknown,
}

/// One item of a `sendMediaGroup` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMedia {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub media: InputFileRef,
    #[serde(default)]
    pub thumbnail: Option<InputFileRef>,
}

impl InputMedia {
    pub fn new(kind: MediaKind, media: impl Into<InputFileRef>) -> Self {
        Self {
            kind,
            media: media.into(),
            thumbnail: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<InputFileRef>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Whether this item carries raw content in its media or thumbnail field.
    pub fn has_upload(&self) -> bool {
        self.media.is_upload() || self.thumbnail.as_ref().is_some_and(InputFileRef::is_upload)
    }
}

/// An outbound bot API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    SendMessage {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        text: String,
    },
    SendPhoto {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        photo: InputFileRef,
    },
    SendAudio {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        audio: InputFileRef,
        thumbnail: Option<InputFileRef>,
    },
    SendDocument {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        document: InputFileRef,
        thumbnail: Option<InputFileRef>,
    },
    SendVideo {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        video: InputFileRef,
        thumbnail: Option<InputFileRef>,
    },
    SendAnimation {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        animation: InputFileRef,
        thumbnail: Option<InputFileRef>,
    },
    SendVoice {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        voice: InputFileRef,
    },
    SendVideoNote {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        video_note: InputFileRef,
        thumbnail: Option<InputFileRef>,
    },
    SendSticker {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        sticker: InputFileRef,
    },
    SendLocation {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        latitude: f64,
        longitude: f64,
    },
    SendMediaGroup {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        media: Vec<InputMedia>,
    },
    SendChatAction {
        chat_id: ChatId,
        message_thread_id: Option<i64>,
        action: ChatAction,
    },
    /// Any other method, passed through untouched.
    Other {
        method: String,
        payload: serde_json::Value,
    },
}

impl ApiRequest {
    pub fn send_message(chat_id: impl Into<ChatId>, text: impl Into<String>) -> Self {
        Self::SendMessage {
            chat_id: chat_id.into(),
            message_thread_id: None,
            text: text.into(),
        }
    }

    pub fn send_photo(chat_id: impl Into<ChatId>, photo: impl Into<InputFileRef>) -> Self {
        Self::SendPhoto {
            chat_id: chat_id.into(),
            message_thread_id: None,
            photo: photo.into(),
        }
    }

    pub fn send_audio(
        chat_id: impl Into<ChatId>,
        audio: impl Into<InputFileRef>,
        thumbnail: Option<InputFileRef>,
    ) -> Self {
        Self::SendAudio {
            chat_id: chat_id.into(),
            message_thread_id: None,
            audio: audio.into(),
            thumbnail,
        }
    }

    pub fn send_document(
        chat_id: impl Into<ChatId>,
        document: impl Into<InputFileRef>,
        thumbnail: Option<InputFileRef>,
    ) -> Self {
        Self::SendDocument {
            chat_id: chat_id.into(),
            message_thread_id: None,
            document: document.into(),
            thumbnail,
        }
    }

    pub fn send_video(
        chat_id: impl Into<ChatId>,
        video: impl Into<InputFileRef>,
        thumbnail: Option<InputFileRef>,
    ) -> Self {
        Self::SendVideo {
            chat_id: chat_id.into(),
            message_thread_id: None,
            video: video.into(),
            thumbnail,
        }
    }

    pub fn send_animation(
        chat_id: impl Into<ChatId>,
        animation: impl Into<InputFileRef>,
        thumbnail: Option<InputFileRef>,
    ) -> Self {
        Self::SendAnimation {
            chat_id: chat_id.into(),
            message_thread_id: None,
            animation: animation.into(),
            thumbnail,
        }
    }

    pub fn send_voice(chat_id: impl Into<ChatId>, voice: impl Into<InputFileRef>) -> Self {
        Self::SendVoice {
            chat_id: chat_id.into(),
            message_thread_id: None,
            voice: voice.into(),
        }
    }

    pub fn send_video_note(
        chat_id: impl Into<ChatId>,
        video_note: impl Into<InputFileRef>,
        thumbnail: Option<InputFileRef>,
    ) -> Self {
        Self::SendVideoNote {
            chat_id: chat_id.into(),
            message_thread_id: None,
            video_note: video_note.into(),
            thumbnail,
        }
    }

    pub fn send_sticker(chat_id: impl Into<ChatId>, sticker: impl Into<InputFileRef>) -> Self {
        Self::SendSticker {
            chat_id: chat_id.into(),
            message_thread_id: None,
            sticker: sticker.into(),
        }
    }

    pub fn send_location(chat_id: impl Into<ChatId>, latitude: f64, longitude: f64) -> Self {
        Self::SendLocation {
            chat_id: chat_id.into(),
            message_thread_id: None,
            latitude,
            longitude,
        }
    }

    pub fn send_media_group(chat_id: impl Into<ChatId>, media: Vec<InputMedia>) -> Self {
        Self::SendMediaGroup {
            chat_id: chat_id.into(),
            message_thread_id: None,
            media,
        }
    }

    pub fn send_chat_action(
        chat_id: impl Into<ChatId>,
        action: ChatAction,
        message_thread_id: Option<i64>,
    ) -> Self {
        Self::SendChatAction {
            chat_id: chat_id.into(),
            message_thread_id,
            action,
        }
    }

    pub fn other(method: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Other {
            method: method.into(),
            payload,
        }
    }

    /// Address the request to a forum topic.
    pub fn in_thread(mut self, thread_id: i64) -> Self {
        match &mut self {
            Self::Other { payload, .. } => {
                if let Some(map) = payload.as_object_mut() {
                    map.insert("message_thread_id".to_owned(), thread_id.into());
                }
            }
            Self::SendMessage {
                message_thread_id, ..
            }
            | Self::SendPhoto {
                message_thread_id, ..
            }
            | Self::SendAudio {
                message_thread_id, ..
            }
            | Self::SendDocument {
                message_thread_id, ..
            }
            | Self::SendVideo {
                message_thread_id, ..
            }
            | Self::SendAnimation {
                message_thread_id, ..
            }
            | Self::SendVoice {
                message_thread_id, ..
            }
            | Self::SendVideoNote {
                message_thread_id, ..
            }
            | Self::SendSticker {
                message_thread_id, ..
            }
            | Self::SendLocation {
                message_thread_id, ..
            }
            | Self::SendMediaGroup {
                message_thread_id, ..
            }
            | Self::SendChatAction {
                message_thread_id, ..
            } => *message_thread_id = Some(thread_id),
        }
        self
    }

    /// Bot API method name.
    pub fn method(&self) -> &str {
        match self {
            Self::SendMessage { .. } => "sendMessage",
            Self::SendPhoto { .. } => "sendPhoto",
            Self::SendAudio { .. } => "sendAudio",
            Self::SendDocument { .. } => "sendDocument",
            Self::SendVideo { .. } => "sendVideo",
            Self::SendAnimation { .. } => "sendAnimation",
            Self::SendVoice { .. } => "sendVoice",
            Self::SendVideoNote { .. } => "sendVideoNote",
            Self::SendSticker { .. } => "sendSticker",
            Self::SendLocation { .. } => "sendLocation",
            Self::SendMediaGroup { .. } => "sendMediaGroup",
            Self::SendChatAction { .. } => "sendChatAction",
            Self::Other { method, .. } => method,
        }
    }

    /// The schedule key this request targets, if it carries a usable chat id.
    pub fn sending_key(&self) -> Option<SendingKey> {
        let (chat_id, message_thread_id) = match self {
            Self::Other { payload, .. } => {
                let chat_id = payload.get("chat_id").and_then(ChatId::from_json)?;
                let thread = payload
                    .get("message_thread_id")
                    .and_then(serde_json::Value::as_i64);
                (chat_id, thread)
            }
            Self::SendMessage {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendPhoto {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendAudio {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendDocument {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendVideo {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendAnimation {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendVoice {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendVideoNote {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendSticker {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendLocation {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendMediaGroup {
                chat_id,
                message_thread_id,
                ..
            }
            | Self::SendChatAction {
                chat_id,
                message_thread_id,
                ..
            } => (chat_id.clone(), *message_thread_id),
        };

        chat_id
            .is_usable()
            .then(|| SendingKey::new(chat_id, message_thread_id))
    }
}
