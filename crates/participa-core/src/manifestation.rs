//! Manifestation types shared by the form, the store and the submission adapter.
//!
//! Storage and wire shapes use camelCase keys so the files stay compatible
//! with what the browser application wrote.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::subjects::Subject;

/// Medium used to express a manifestation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Text,
    Audio,
    Image,
    Video,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Self::Text, Self::Audio, Self::Image, Self::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Portuguese name shown to citizens.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Text => "Texto",
            Self::Audio => "Áudio",
            Self::Image => "Imagem",
            Self::Video => "Vídeo",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "audio" => Ok(Self::Audio),
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(CoreError::UnknownChannel(other.to_string())),
        }
    }
}

/// How the citizen identifies themselves. Contact fields are empty strings
/// until filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserIdentification {
    pub is_anonymous: bool,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Subject chosen in the subject step, with the agency it routes to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectSelection {
    pub subject_id: String,
    pub subject_label: String,
    pub suggested_agency: String,
}

impl SubjectSelection {
    pub fn is_selected(&self) -> bool {
        !self.subject_id.is_empty()
    }
}

impl From<&Subject> for SubjectSelection {
    fn from(subject: &Subject) -> Self {
        Self {
            subject_id: subject.id.to_string(),
            subject_label: subject.label.to_string(),
            suggested_agency: subject.suggested_agency.to_string(),
        }
    }
}

/// Binary media attached to a manifestation.
///
/// Deliberately not `Serialize`: attachments only live in memory and can
/// never end up in a persisted draft or an outbound payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    /// Recording length, for audio.
    pub duration_secs: Option<u32>,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes: data.len() as u64,
            duration_secs: None,
            data,
        }
    }

    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_secs = Some(secs);
        self
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .field("duration_secs", &self.duration_secs)
            .finish_non_exhaustive()
    }
}

/// Content of a manifestation, one variant per channel.
///
/// Every variant carries free text (typed, or fed by speech recognition);
/// media variants additionally hold their attachment once provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestationContent {
    Text { text: String },
    Audio { text: String, recording: Option<Attachment> },
    Image { text: String, file: Option<Attachment> },
    Video { text: String, file: Option<Attachment> },
}

impl Default for ManifestationContent {
    fn default() -> Self {
        Self::Text {
            text: String::new(),
        }
    }
}

impl ManifestationContent {
    /// Empty content for `channel` carrying `text`.
    pub fn with_text(channel: Channel, text: String) -> Self {
        match channel {
            Channel::Text => Self::Text { text },
            Channel::Audio => Self::Audio {
                text,
                recording: None,
            },
            Channel::Image => Self::Image { text, file: None },
            Channel::Video => Self::Video { text, file: None },
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Self::Text { .. } => Channel::Text,
            Self::Audio { .. } => Channel::Audio,
            Self::Image { .. } => Channel::Image,
            Self::Video { .. } => Channel::Video,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Text { text }
            | Self::Audio { text, .. }
            | Self::Image { text, .. }
            | Self::Video { text, .. } => text,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        match self {
            Self::Text { text }
            | Self::Audio { text, .. }
            | Self::Image { text, .. }
            | Self::Video { text, .. } => *text = value.into(),
        }
    }

    /// Content after the citizen picks `channel`.
    ///
    /// All channel-specific data is dropped. Text survives only when the new
    /// channel is text itself.
    pub fn switch_channel(&self, channel: Channel) -> Self {
        let text = match channel {
            Channel::Text => self.text().to_string(),
            _ => String::new(),
        };
        Self::with_text(channel, text)
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            Self::Text { .. } => None,
            Self::Audio { recording, .. } => recording.as_ref(),
            Self::Image { file, .. } | Self::Video { file, .. } => file.as_ref(),
        }
    }

    /// Store `attachment` in the media slot. Returns `false` on the text channel,
    /// which has no slot.
    pub fn set_attachment(&mut self, attachment: Attachment) -> bool {
        match self {
            Self::Text { .. } => false,
            Self::Audio { recording, .. } => {
                *recording = Some(attachment);
                true
            }
            Self::Image { file, .. } | Self::Video { file, .. } => {
                *file = Some(attachment);
                true
            }
        }
    }

    pub fn clear_attachment(&mut self) {
        match self {
            Self::Text { .. } => {}
            Self::Audio { recording, .. } => *recording = None,
            Self::Image { file, .. } | Self::Video { file, .. } => *file = None,
        }
    }

    pub fn has_audio(&self) -> bool {
        matches!(self, Self::Audio { recording: Some(_), .. })
    }

    pub fn has_image(&self) -> bool {
        matches!(self, Self::Image { file: Some(_), .. })
    }

    pub fn has_video(&self) -> bool {
        matches!(self, Self::Video { file: Some(_), .. })
    }
}

/// Everything a citizen fills in before submitting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifestation {
    pub identification: UserIdentification,
    pub subject: SubjectSelection,
    pub content: ManifestationContent,
    pub consent: bool,
}

// ── Submission wire types ──

/// Structured payload sent to the submission endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub identification: PayloadIdentification,
    pub subject: SubjectSelection,
    pub content: PayloadContent,
    pub metadata: PayloadMetadata,
}

/// Contact data; all `None` for anonymous manifestations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadIdentification {
    pub anonymous: bool,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Content reduced to text plus presence flags; binaries are not transported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadContent {
    pub channel: Channel,
    pub text: Option<String>,
    pub has_audio: bool,
    pub has_image: bool,
    pub has_video: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    /// ISO 8601 timestamp string.
    pub timestamp: String,
    pub user_agent: String,
    pub accessibility_mode: bool,
}

/// Endpoint reply, also what the adapter hands back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub protocol: String,
    pub message: String,
}
