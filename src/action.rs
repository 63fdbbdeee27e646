//! Chat action vocabulary.
//!
//! A chat action is the short-lived status a bot API shows to the people in a
//! conversation ("typing…", "sending photo…"). The set is closed and mirrors
//! the values accepted by `sendChatAction`.

use crate::error::ChatActionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single activity cue shown to a conversation participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordVoice,
    UploadVoice,
    UploadDocument,
    ChooseSticker,
    FindLocation,
    RecordVideoNote,
    UploadVideoNote,
}

impl ChatAction {
    /// Every chat action, in declaration order.
    pub const ALL: [ChatAction; 11] = [
        Self::Typing,
        Self::UploadPhoto,
        Self::RecordVideo,
        Self::UploadVideo,
        Self::RecordVoice,
        Self::UploadVoice,
        Self::UploadDocument,
        Self::ChooseSticker,
        Self::FindLocation,
        Self::RecordVideoNote,
        Self::UploadVideoNote,
    ];

    /// Wire name of the action as sent in the `action` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::UploadPhoto => "upload_photo",
            Self::RecordVideo => "record_video",
            Self::UploadVideo => "upload_video",
            Self::RecordVoice => "record_voice",
            Self::UploadVoice => "upload_voice",
            Self::UploadDocument => "upload_document",
            Self::ChooseSticker => "choose_sticker",
            Self::FindLocation => "find_location",
            Self::RecordVideoNote => "record_video_note",
            Self::UploadVideoNote => "upload_video_note",
        }
    }
}

impl fmt::Display for ChatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatAction {
    type Err = ChatActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == name)
            .ok_or_else(|| ChatActionError::UnknownChatAction(name.to_owned()))
    }
}
