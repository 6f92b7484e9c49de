//! Outbound payload preparation.

use participa_core::protocol::now_iso;
use participa_core::{
    Config, Manifestation, PayloadContent, PayloadIdentification, PayloadMetadata, SubmissionPayload,
};

/// Empty strings become `None`; anything else is sent as typed.
fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Reduce a manifestation to the wire payload.
///
/// Contact fields are dropped for anonymous manifestations; attachments become
/// presence flags.
pub fn prepare_payload(manifestation: &Manifestation, config: &Config) -> SubmissionPayload {
    let id = &manifestation.identification;
    let identification = if id.is_anonymous {
        PayloadIdentification {
            anonymous: true,
            name: None,
            email: None,
            phone: None,
        }
    } else {
        PayloadIdentification {
            anonymous: false,
            name: non_empty(&id.name),
            email: non_empty(&id.email),
            phone: non_empty(&id.phone),
        }
    };

    let content = &manifestation.content;
    SubmissionPayload {
        identification,
        subject: manifestation.subject.clone(),
        content: PayloadContent {
            channel: content.channel(),
            text: non_empty(content.text()),
            has_audio: content.has_audio(),
            has_image: content.has_image(),
            has_video: content.has_video(),
        },
        metadata: PayloadMetadata {
            timestamp: now_iso(),
            user_agent: config.user_agent().to_string(),
            accessibility_mode: config.accessibility_mode(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use participa_core::{Attachment, Channel, ManifestationContent, SubmitMode, UserIdentification};

    fn config() -> Config {
        Config::new(".participa".into(), None, SubmitMode::Demo)
            .unwrap()
            .with_accessibility_mode(true)
            .with_user_agent("test-agent")
    }

    fn identified() -> UserIdentification {
        UserIdentification {
            is_anonymous: false,
            name: "Ana Souza".into(),
            email: "ana@example.com".into(),
            phone: "".into(),
        }
    }

    #[test]
    fn anonymous_redacts_contact() {
        let mut m = Manifestation {
            identification: identified(),
            ..Default::default()
        };
        m.identification.is_anonymous = true;
        let p = prepare_payload(&m, &config());
        assert!(p.identification.anonymous);
        assert_eq!(p.identification.name, None);
        assert_eq!(p.identification.email, None);
        assert_eq!(p.identification.phone, None);
    }

    #[test]
    fn identified_keeps_filled_fields() {
        let m = Manifestation {
            identification: identified(),
            ..Default::default()
        };
        let p = prepare_payload(&m, &config());
        assert_eq!(p.identification.name.as_deref(), Some("Ana Souza"));
        assert_eq!(p.identification.email.as_deref(), Some("ana@example.com"));
        assert_eq!(p.identification.phone, None);
    }

    #[test]
    fn content_flags_and_text() {
        let mut content = ManifestationContent::with_text(Channel::Image, String::new());
        content.set_attachment(Attachment::new("foto.png", "image/png", vec![1]));
        let m = Manifestation {
            content,
            ..Default::default()
        };
        let p = prepare_payload(&m, &config());
        assert_eq!(p.content.channel, Channel::Image);
        assert_eq!(p.content.text, None);
        assert!(p.content.has_image);
        assert!(!p.content.has_audio);
        assert!(!p.content.has_video);
    }

    #[test]
    fn text_sent_verbatim() {
        let mut m = Manifestation::default();
        m.content.set_text("  linha 1\n");
        let p = prepare_payload(&m, &config());
        assert_eq!(p.content.text.as_deref(), Some("  linha 1\n"));

        let mut m = Manifestation {
            identification: identified(),
            ..Default::default()
        };
        m.identification.name = " Ana ".into();
        let p = prepare_payload(&m, &config());
        assert_eq!(p.identification.name.as_deref(), Some(" Ana "));
    }

    #[test]
    fn metadata_and_json_shape() {
        let mut m = Manifestation::default();
        m.content.set_text("Lixo na rua");
        let p = prepare_payload(&m, &config());
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["content"]["text"], "Lixo na rua");
        assert_eq!(json["content"]["hasVideo"], false);
        assert_eq!(json["metadata"]["userAgent"], "test-agent");
        assert_eq!(json["metadata"]["accessibilityMode"], true);
        assert!(json["metadata"]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(json["subject"]["subjectId"], "");
    }
}
