//! Wizard controller.
//!
//! `FormController` owns the draft for one wizard session. Every mutation is
//! followed by the persistence rule: steps Identification..=Review write the
//! draft (text only) to the draft store; reaching Home wipes memory and the
//! stored draft; reaching Confirmation drops the stored draft but keeps the
//! in-memory copy so the protocol can be shown until the next reset.

use participa_core::subjects::subject_by_id;
use participa_core::{Attachment, Channel, Manifestation, Subject, SubjectSelection, SubmissionResponse, UserIdentification};
use participa_store::{DraftStore, StoredDraft};
use participa_sync::SubmissionAdapter;
use tracing::{debug, info, warn};

use crate::step::Step;
use crate::validation::{
    Field, FieldErrors, check_attachment, validate_consent, validate_content, validate_identification,
    validate_subject,
};
use crate::viewport::Viewport;

const SUBMIT_REJECTED: &str = "Erro ao enviar manifestação";
const SUBMIT_FAILED: &str = "Erro de conexão. Por favor, tente novamente.";

/// The wizard's working state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub step: Step,
    pub manifestation: Manifestation,
    /// Set once a submission succeeds.
    pub protocol: Option<String>,
}

pub struct FormController<V: Viewport> {
    draft: FormDraft,
    drafts: DraftStore,
    viewport: V,
}

impl<V: Viewport> FormController<V> {
    /// Start a session, resuming the stored draft when there is one.
    ///
    /// Starting at Home deletes whatever is stored, including corrupt or
    /// out-of-range drafts.
    pub fn mount(drafts: DraftStore, viewport: V) -> Self {
        let resumed = drafts.load().and_then(|stored| match Step::try_from(stored.current_step) {
            Ok(step) if step.is_persisted() => Some((step, stored)),
            _ => {
                debug!(step = stored.current_step, "ignoring stored draft outside the form");
                None
            }
        });
        let draft = match resumed {
            Some((step, stored)) => {
                info!(%step, "resuming stored draft");
                FormDraft {
                    step,
                    manifestation: stored.restore(),
                    protocol: None,
                }
            }
            None => {
                drafts.clear();
                FormDraft::default()
            }
        };
        Self {
            draft,
            drafts,
            viewport,
        }
    }

    pub fn step(&self) -> Step {
        self.draft.step
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn manifestation(&self) -> &Manifestation {
        &self.draft.manifestation
    }

    pub fn protocol(&self) -> Option<&str> {
        self.draft.protocol.as_deref()
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    // ── Transitions ──

    pub fn next(&mut self) {
        self.go_to(self.draft.step.next());
    }

    pub fn prev(&mut self) {
        self.go_to(self.draft.step.prev());
    }

    /// Jump straight to `step`.
    pub fn go_to(&mut self, step: Step) {
        let from = self.draft.step;
        self.draft.step = step;
        match step {
            Step::Home => {
                self.draft = FormDraft::default();
                self.drafts.clear();
            }
            Step::Confirmation => self.drafts.clear(),
            _ => self.persist(),
        }
        debug!(%from, to = %step, "step transition");
        self.viewport.scroll_to_top();
        self.viewport.focus_main_content();
    }

    pub fn reset(&mut self) {
        self.go_to(Step::Home);
    }

    // ── Edits ──

    pub fn set_identification(&mut self, identification: UserIdentification) {
        self.draft.manifestation.identification = identification;
        self.persist();
    }

    pub fn set_subject(&mut self, subject: SubjectSelection) {
        self.draft.manifestation.subject = subject;
        self.persist();
    }

    pub fn select_subject(&mut self, subject: &Subject) {
        self.set_subject(subject.into());
    }

    /// Select a catalog subject by id. Returns `false` for unknown ids.
    pub fn select_subject_by_id(&mut self, id: &str) -> bool {
        match subject_by_id(id) {
            Some(subject) => {
                self.select_subject(subject);
                true
            }
            None => false,
        }
    }

    /// Pick a channel and move on to the content step.
    pub fn select_channel(&mut self, channel: Channel) {
        let content = self.draft.manifestation.content.switch_channel(channel);
        self.draft.manifestation.content = content;
        self.go_to(Step::Content);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.manifestation.content.set_text(text);
        self.persist();
    }

    /// Attach media to the current channel. Rejected attachments leave the
    /// content untouched.
    pub fn attach(&mut self, attachment: Attachment) -> Result<(), FieldErrors> {
        let content = &mut self.draft.manifestation.content;
        check_attachment(content.channel(), &attachment)
            .map_err(|message| FieldErrors::single(Field::Content, message))?;
        content.set_attachment(attachment);
        self.persist();
        Ok(())
    }

    pub fn clear_attachment(&mut self) {
        self.draft.manifestation.content.clear_attachment();
        self.persist();
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.draft.manifestation.consent = consent;
        self.persist();
    }

    // ── Step gates ──

    pub fn confirm_identification(&mut self) -> Result<(), FieldErrors> {
        validate_identification(&self.draft.manifestation.identification).into_result()?;
        self.next();
        Ok(())
    }

    pub fn confirm_subject(&mut self) -> Result<(), FieldErrors> {
        validate_subject(&self.draft.manifestation).into_result()?;
        self.next();
        Ok(())
    }

    pub fn confirm_content(&mut self) -> Result<(), FieldErrors> {
        validate_content(&self.draft.manifestation.content).into_result()?;
        self.next();
        Ok(())
    }

    /// Submit from the review step.
    ///
    /// Requires consent. On success the protocol is stored and the wizard moves
    /// to Confirmation; otherwise the step is unchanged and the reason is
    /// reported under [`Field::Submission`].
    pub async fn submit(&mut self, adapter: &SubmissionAdapter) -> Result<SubmissionResponse, FieldErrors> {
        validate_consent(self.draft.manifestation.consent).into_result()?;

        match adapter.submit(&self.draft.manifestation).await {
            Ok(reply) if reply.success => {
                info!(protocol = %reply.protocol, "wizard submission accepted");
                self.draft.protocol = Some(reply.protocol.clone());
                self.go_to(Step::Confirmation);
                Ok(reply)
            }
            Ok(reply) => {
                let message = if reply.message.is_empty() {
                    SUBMIT_REJECTED.to_string()
                } else {
                    reply.message
                };
                Err(FieldErrors::single(Field::Submission, message))
            }
            Err(e) => {
                warn!(error = %e, "wizard submission failed");
                Err(FieldErrors::single(Field::Submission, SUBMIT_FAILED))
            }
        }
    }

    fn persist(&self) {
        if self.draft.step.is_persisted() {
            self.drafts
                .save(&StoredDraft::capture(&self.draft.manifestation, self.draft.step.index()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use participa_core::{Config, SubmissionPayload, SubmitMode, is_valid_protocol};
    use participa_store::{DRAFT_KEY, KeyValueStore, MemoryStore, ProtocolRegistry};
    use participa_sync::{SubmissionEndpoint, SyncError};
    use std::sync::Arc;

    /// Records viewport calls in order.
    #[derive(Default)]
    struct SpyViewport {
        calls: Vec<&'static str>,
    }

    impl Viewport for SpyViewport {
        fn scroll_to_top(&mut self) {
            self.calls.push("scroll");
        }
        fn focus_main_content(&mut self) {
            self.calls.push("focus");
        }
    }

    fn controller() -> (FormController<SpyViewport>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let drafts = DraftStore::new(store.clone());
        (FormController::mount(drafts, SpyViewport::default()), store)
    }

    fn remount(store: &Arc<MemoryStore>) -> FormController<SpyViewport> {
        FormController::mount(DraftStore::new(store.clone()), SpyViewport::default())
    }

    fn stored(store: &MemoryStore) -> Option<serde_json::Value> {
        store
            .get(DRAFT_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    fn person() -> UserIdentification {
        UserIdentification {
            is_anonymous: false,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: String::new(),
        }
    }

    // ── Transitions ──

    #[test]
    fn next_prev_clamp() {
        let (mut form, _) = controller();
        form.prev();
        assert_eq!(form.step(), Step::Home);
        for _ in 0..10 {
            form.next();
        }
        assert_eq!(form.step(), Step::Confirmation);
        form.prev();
        assert_eq!(form.step(), Step::Review);
    }

    #[test]
    fn every_transition_scrolls_then_focuses() {
        let (mut form, _) = controller();
        form.next();
        form.go_to(Step::Review);
        form.prev();
        form.reset();
        assert_eq!(form.viewport().calls.len(), 8);
        assert!(form.viewport().calls.chunks(2).all(|c| c == ["scroll", "focus"]));
    }

    #[test]
    fn going_home_clears_everything() {
        let (mut form, store) = controller();
        form.next();
        form.set_identification(person());
        form.select_subject_by_id("saude");
        form.go_to(Step::Content);
        form.set_text("texto");
        form.set_consent(true);
        assert!(stored(&store).is_some());

        form.go_to(Step::Home);
        assert_eq!(form.draft(), &FormDraft::default());
        assert!(stored(&store).is_none());
    }

    #[test]
    fn prev_into_home_also_clears() {
        let (mut form, store) = controller();
        form.next();
        form.set_identification(person());
        form.prev();
        assert_eq!(form.manifestation().identification, UserIdentification::default());
        assert!(store.is_empty());
    }

    // ── Persistence ──

    #[test]
    fn text_survives_reload_without_binaries() {
        let (mut form, store) = controller();
        form.next();
        form.go_to(Step::Channel);
        form.select_channel(Channel::Audio);
        form.set_text("foo");
        form.attach(Attachment::new("a.webm", "audio/webm", vec![1, 2, 3]).with_duration(5))
            .unwrap();
        assert_eq!(form.step(), Step::Content);

        let json = stored(&store).unwrap();
        assert_eq!(json["currentStep"], 4);
        assert_eq!(json["content"].as_object().unwrap().len(), 2);

        let reloaded = remount(&store);
        assert_eq!(reloaded.step(), Step::Content);
        assert_eq!(reloaded.manifestation().content.text(), "foo");
        assert_eq!(reloaded.manifestation().content.channel(), Channel::Audio);
        assert!(!reloaded.manifestation().content.has_audio());
    }

    #[test]
    fn home_edits_are_not_persisted() {
        let (mut form, store) = controller();
        form.set_text("rascunho");
        assert!(store.is_empty());
    }

    #[test]
    fn mount_discards_out_of_range_or_corrupt_draft() {
        let store = Arc::new(MemoryStore::new());
        for raw in [r#"{"currentStep":6}"#, r#"{"currentStep":0}"#, r#"{"currentStep":42}"#, "garbage"] {
            store.set(DRAFT_KEY, raw).unwrap();
            assert_eq!(remount(&store).step(), Step::Home, "{raw}");
            assert!(store.get(DRAFT_KEY).unwrap().is_none(), "{raw} left in storage");
        }
    }

    #[test]
    fn mount_does_not_touch_viewport() {
        let (form, _) = controller();
        assert!(form.viewport().calls.is_empty());
    }

    // ── Channel switching ──

    #[test]
    fn channel_switch_keeps_text_only_for_text() {
        let (mut form, _) = controller();
        form.go_to(Step::Channel);
        form.select_channel(Channel::Text);
        form.set_text("meu relato");

        form.go_to(Step::Channel);
        form.select_channel(Channel::Text);
        assert_eq!(form.manifestation().content.text(), "meu relato");

        form.go_to(Step::Channel);
        form.select_channel(Channel::Image);
        assert_eq!(form.manifestation().content.text(), "");
        assert_eq!(form.manifestation().content.channel(), Channel::Image);
    }

    #[test]
    fn rejected_attachment_leaves_content() {
        let (mut form, _) = controller();
        form.go_to(Step::Channel);
        form.select_channel(Channel::Image);
        let err = form
            .attach(Attachment::new("doc.pdf", "application/pdf", vec![0]))
            .unwrap_err();
        assert!(err.get(Field::Content).is_some());
        assert!(!form.manifestation().content.has_image());

        form.attach(Attachment::new("foto.jpg", "image/jpeg", vec![0])).unwrap();
        assert!(form.manifestation().content.has_image());
        form.clear_attachment();
        assert!(!form.manifestation().content.has_image());
    }

    // ── Gates ──

    #[test]
    fn gates_block_without_changing_step() {
        let (mut form, _) = controller();
        form.next();
        let err = form.confirm_identification().unwrap_err();
        assert!(err.get(Field::Name).is_some());
        assert_eq!(form.step(), Step::Identification);

        form.set_identification(UserIdentification {
            is_anonymous: true,
            ..Default::default()
        });
        form.confirm_identification().unwrap();
        assert_eq!(form.step(), Step::Subject);

        assert!(form.confirm_subject().is_err());
        assert!(!form.select_subject_by_id("nao-existe"));
        assert!(form.select_subject_by_id("transito"));
        form.confirm_subject().unwrap();
        assert_eq!(form.step(), Step::Channel);

        form.select_channel(Channel::Video);
        assert!(form.confirm_content().is_err());
        assert_eq!(form.step(), Step::Content);
        form.attach(Attachment::new("v.mp4", "video/mp4", vec![0])).unwrap();
        form.confirm_content().unwrap();
        assert_eq!(form.step(), Step::Review);
    }

    // ── Submission ──

    struct Unreachable;

    #[async_trait]
    impl SubmissionEndpoint for Unreachable {
        async fn submit(&self, _: &SubmissionPayload) -> Result<SubmissionResponse, SyncError> {
            Err(SyncError::Server {
                status: 502,
                body: String::new(),
            })
        }
    }

    struct Rejecting;

    #[async_trait]
    impl SubmissionEndpoint for Rejecting {
        async fn submit(&self, _: &SubmissionPayload) -> Result<SubmissionResponse, SyncError> {
            Ok(SubmissionResponse {
                success: false,
                protocol: String::new(),
                message: String::new(),
            })
        }
    }

    fn adapter(endpoint: Arc<dyn SubmissionEndpoint>, mode: SubmitMode) -> SubmissionAdapter {
        let config = Config::new(".participa".into(), None, mode).unwrap();
        SubmissionAdapter::new(
            Some(endpoint),
            ProtocolRegistry::new(Arc::new(MemoryStore::new())),
            config,
        )
    }

    fn at_review() -> (FormController<SpyViewport>, Arc<MemoryStore>) {
        let (mut form, store) = controller();
        form.go_to(Step::Identification);
        form.set_identification(person());
        form.select_subject_by_id("saude");
        form.go_to(Step::Channel);
        form.select_channel(Channel::Text);
        form.set_text("Minha consulta no hospital foi cancelada");
        form.go_to(Step::Review);
        (form, store)
    }

    #[tokio::test]
    async fn submit_requires_consent() {
        let (mut form, _) = at_review();
        let adapter = adapter(Arc::new(Unreachable), SubmitMode::Demo);
        let err = form.submit(&adapter).await.unwrap_err();
        assert!(err.get(Field::Consent).is_some());
        assert_eq!(form.step(), Step::Review);
        assert!(adapter.registry().list().is_empty());
    }

    #[tokio::test]
    async fn demo_submit_reaches_confirmation() {
        let (mut form, store) = at_review();
        form.set_consent(true);
        let adapter = adapter(Arc::new(Unreachable), SubmitMode::Demo);

        let reply = form.submit(&adapter).await.unwrap();
        assert!(is_valid_protocol(&reply.protocol));
        assert_eq!(form.step(), Step::Confirmation);
        assert_eq!(form.protocol(), Some(reply.protocol.as_str()));
        assert!(stored(&store).is_none());
        assert_eq!(adapter.registry().list()[0].subject_label, "Saúde");

        // Memory is kept until reset.
        assert_eq!(form.manifestation().identification.name, "Ana");
        form.reset();
        assert!(form.protocol().is_none());
    }

    #[tokio::test]
    async fn strict_failure_stays_on_review() {
        let (mut form, store) = at_review();
        form.set_consent(true);
        let adapter = adapter(Arc::new(Unreachable), SubmitMode::Strict);

        let err = form.submit(&adapter).await.unwrap_err();
        assert_eq!(err.get(Field::Submission), Some(SUBMIT_FAILED));
        assert_eq!(form.step(), Step::Review);
        assert!(stored(&store).is_some());
    }

    #[tokio::test]
    async fn rejection_reports_default_message() {
        let (mut form, _) = at_review();
        form.set_consent(true);
        let adapter = adapter(Arc::new(Rejecting), SubmitMode::Demo);

        let err = form.submit(&adapter).await.unwrap_err();
        assert_eq!(err.get(Field::Submission), Some(SUBMIT_REJECTED));
        assert_eq!(form.step(), Step::Review);
    }
}
