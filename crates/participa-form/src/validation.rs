//! Validation gates for each wizard step, and attachment limits.
//!
//! Messages are the Portuguese texts shown inline next to the field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use participa_core::{Attachment, Channel, Manifestation, ManifestationContent, UserIdentification};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const MAX_TEXT_CHARS: usize = 5000;
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;
pub const MAX_AUDIO_SECS: u32 = 120;

pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
pub const VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime"];

/// Form field a validation message is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Content,
    Consent,
    /// Submission outcome, shown above the submit button.
    Submission,
}

/// Field-level validation messages. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Record a message; the first message for a field wins.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field:?}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_identification(id: &UserIdentification) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if id.is_anonymous {
        return errors;
    }
    if id.name.trim().is_empty() {
        errors.insert(Field::Name, "Por favor, informe seu nome");
    }
    if id.email.trim().is_empty() {
        errors.insert(Field::Email, "Por favor, informe seu e-mail");
    } else if !is_valid_email(&id.email) {
        errors.insert(Field::Email, "Por favor, informe um e-mail válido");
    }
    errors
}

pub fn validate_subject(m: &Manifestation) -> FieldErrors {
    if m.subject.is_selected() {
        FieldErrors::new()
    } else {
        FieldErrors::single(Field::Subject, "Por favor, selecione um assunto")
    }
}

pub fn validate_content(content: &ManifestationContent) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if content.text().chars().count() > MAX_TEXT_CHARS {
        errors.insert(
            Field::Content,
            format!("O texto deve ter no máximo {MAX_TEXT_CHARS} caracteres"),
        );
    }
    let missing = match content {
        ManifestationContent::Text { text } if text.trim().is_empty() => {
            Some("Por favor, escreva sua manifestação")
        }
        ManifestationContent::Audio { recording: None, .. } => {
            Some("Por favor, grave um áudio antes de continuar")
        }
        ManifestationContent::Image { file: None, .. } => {
            Some("Por favor, selecione uma imagem antes de continuar")
        }
        ManifestationContent::Video { file: None, .. } => {
            Some("Por favor, selecione um vídeo antes de continuar")
        }
        _ => None,
    };
    if let Some(message) = missing {
        errors.insert(Field::Content, message);
    }
    errors
}

pub fn validate_consent(consent: bool) -> FieldErrors {
    if consent {
        FieldErrors::new()
    } else {
        FieldErrors::single(
            Field::Consent,
            "Por favor, confirme que você leu e concorda com os termos",
        )
    }
}

/// Check an attachment against the limits of `channel`.
pub fn check_attachment(channel: Channel, attachment: &Attachment) -> Result<(), String> {
    match channel {
        Channel::Text => Err("O canal de texto não aceita anexos.".to_string()),
        Channel::Audio => {
            if !attachment.mime_type.starts_with("audio/") {
                return Err("Formato de áudio não suportado.".to_string());
            }
            match attachment.duration_secs {
                Some(secs) if secs > MAX_AUDIO_SECS => {
                    Err("A gravação deve ter no máximo 2 minutos.".to_string())
                }
                _ => Ok(()),
            }
        }
        Channel::Image => {
            if !IMAGE_TYPES.contains(&attachment.mime_type.as_str()) {
                return Err("Formato não suportado. Use JPG, PNG, GIF ou WebP.".to_string());
            }
            if attachment.size_bytes > MAX_IMAGE_BYTES {
                return Err("A imagem deve ter no máximo 10MB.".to_string());
            }
            Ok(())
        }
        Channel::Video => {
            if !VIDEO_TYPES.contains(&attachment.mime_type.as_str()) {
                return Err("Formato não suportado. Use MP4, WebM ou MOV.".to_string());
            }
            if attachment.size_bytes > MAX_VIDEO_BYTES {
                return Err("O vídeo deve ter no máximo 100MB.".to_string());
            }
            Ok(())
        }
    }
}

/// Every gate at once, as a flat list of messages in form order.
pub fn validate_submission(m: &Manifestation) -> Vec<String> {
    let mut messages = validate_identification(&m.identification).messages();
    messages.extend(validate_subject(m).messages());
    messages.extend(validate_content(&m.content).messages());
    messages.extend(validate_consent(m.consent).messages());
    messages
}
