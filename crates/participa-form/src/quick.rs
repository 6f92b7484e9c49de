//! Quick voice mode: record, review the transcript, classify, get a protocol.
//!
//! The speech recognizer and the recorder are platform collaborators; this
//! session only consumes what they produce (transcript segments, one-second
//! timer ticks, and the finished recording).

use std::fmt;

use participa_classify::{ClassificationResult, KeywordClassifier};
use participa_core::{Attachment, Channel, ProtocolRecord, generate_protocol};
use participa_store::ProtocolRegistry;
use tracing::{debug, info};

use crate::FormError;
use crate::validation::MAX_AUDIO_SECS;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuickStep {
    #[default]
    Recording,
    EditTranscript,
    Transcription,
    Classification,
    Done,
}

/// Accumulates recognizer output.
///
/// Final segments are appended followed by a space; the interim segment is
/// replaced on every update and only shown live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptBuffer {
    committed: String,
    interim: String,
}

impl TranscriptBuffer {
    pub fn push_final(&mut self, segment: &str) {
        self.committed.push_str(segment);
        self.committed.push(' ');
    }

    pub fn set_interim(&mut self, segment: &str) {
        self.interim.clear();
        self.interim.push_str(segment);
    }

    /// Committed transcript.
    pub fn text(&self) -> &str {
        &self.committed
    }

    /// Committed transcript followed by the pending interim segment.
    pub fn live(&self) -> String {
        format!("{}{}", self.committed, self.interim)
    }

    /// Drop the interim segment and trim the committed text.
    pub fn finish(&mut self) {
        self.interim.clear();
        let trimmed = self.committed.trim();
        if trimmed.len() != self.committed.len() {
            self.committed = trimmed.to_string();
        }
    }

    /// Replace the transcript with user-edited text.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.committed = text.into();
        self.interim.clear();
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.interim.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.committed.trim().is_empty()
    }
}

/// Outcome of a timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running(u32),
    LimitReached,
}

/// Seconds-resolution recording timer capped at the audio limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingTimer {
    elapsed: u32,
    running: bool,
}

impl RecordingTimer {
    pub fn start(&mut self) {
        self.elapsed = 0;
        self.running = true;
    }

    /// Advance one second. Reaching the limit stops the timer.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::LimitReached;
        }
        self.elapsed += 1;
        if self.elapsed >= MAX_AUDIO_SECS {
            self.running = false;
            Tick::LimitReached
        } else {
            Tick::Running(self.elapsed)
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn remaining(&self) -> u32 {
        MAX_AUDIO_SECS.saturating_sub(self.elapsed)
    }
}

/// `m:ss`
pub fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl fmt::Display for RecordingTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {}",
            format_duration(self.elapsed),
            format_duration(MAX_AUDIO_SECS)
        )
    }
}

pub struct QuickVoiceSession<V: Viewport> {
    step: QuickStep,
    transcript: TranscriptBuffer,
    timer: RecordingTimer,
    recording: Option<Attachment>,
    classification: Option<ClassificationResult>,
    protocol: Option<String>,
    classifier: KeywordClassifier,
    registry: ProtocolRegistry,
    viewport: V,
}

impl<V: Viewport> QuickVoiceSession<V> {
    pub fn new(registry: ProtocolRegistry, viewport: V) -> Self {
        Self::with_classifier(KeywordClassifier::default(), registry, viewport)
    }

    pub fn with_classifier(classifier: KeywordClassifier, registry: ProtocolRegistry, viewport: V) -> Self {
        Self {
            step: QuickStep::Recording,
            transcript: TranscriptBuffer::default(),
            timer: RecordingTimer::default(),
            recording: None,
            classification: None,
            protocol: None,
            classifier,
            registry,
            viewport,
        }
    }

    pub fn step(&self) -> QuickStep {
        self.step
    }

    pub fn transcript(&self) -> &TranscriptBuffer {
        &self.transcript
    }

    pub fn timer(&self) -> &RecordingTimer {
        &self.timer
    }

    pub fn recording(&self) -> Option<&Attachment> {
        self.recording.as_ref()
    }

    pub fn classification(&self) -> Option<&ClassificationResult> {
        self.classification.as_ref()
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn is_recording(&self) -> bool {
        self.timer.is_running()
    }

    // ── Recording ──

    /// Start a fresh recording, discarding any previous transcript.
    pub fn start_recording(&mut self) -> Result<(), FormError> {
        self.require_step(QuickStep::Recording, "start recording")?;
        self.transcript.clear();
        self.recording = None;
        self.timer.start();
        debug!("quick mode recording started");
        Ok(())
    }

    pub fn push_final(&mut self, segment: &str) {
        if self.is_recording() {
            self.transcript.push_final(segment);
        }
    }

    pub fn push_interim(&mut self, segment: &str) {
        if self.is_recording() {
            self.transcript.set_interim(segment);
        }
    }

    /// One-second tick from the platform timer. Returns `true` when the
    /// recording was stopped because it hit the limit.
    pub fn tick(&mut self) -> bool {
        if !self.is_recording() {
            return false;
        }
        match self.timer.tick() {
            Tick::Running(_) => false,
            Tick::LimitReached => {
                info!(secs = MAX_AUDIO_SECS, "recording limit reached");
                self.transcript.finish();
                true
            }
        }
    }

    /// Stop recording and keep the captured audio, if the recorder produced any.
    pub fn stop_recording(&mut self, recording: Option<Attachment>) {
        self.timer.stop();
        self.transcript.finish();
        let secs = self.timer.elapsed();
        self.recording = recording.map(|a| match a.duration_secs {
            Some(_) => a,
            None => a.with_duration(secs),
        });
        debug!(secs, chars = self.transcript.text().len(), "quick mode recording stopped");
    }

    /// Discard the recording and transcript and return to the recording step.
    pub fn restart(&mut self) {
        self.transcript.clear();
        self.timer.reset();
        self.recording = None;
        self.classification = None;
        self.protocol = None;
        self.set_step(QuickStep::Recording);
    }

    // ── Review ──

    pub fn edit_transcript(&mut self) -> Result<(), FormError> {
        self.require_step(QuickStep::Recording, "edit the transcript")?;
        if self.is_recording() {
            return Err(FormError::StillRecording);
        }
        self.set_step(QuickStep::EditTranscript);
        Ok(())
    }

    pub fn set_transcript(&mut self, text: impl Into<String>) {
        self.transcript.replace(text);
    }

    pub fn review_transcript(&mut self) -> Result<(), FormError> {
        self.require_step(QuickStep::EditTranscript, "review the transcript")?;
        self.set_step(QuickStep::Transcription);
        Ok(())
    }

    /// Return from the transcript review to the editor, keeping the text.
    pub fn back_to_edit(&mut self) -> Result<(), FormError> {
        self.require_step(QuickStep::Transcription, "go back to editing")?;
        self.set_step(QuickStep::EditTranscript);
        Ok(())
    }

    /// Classify the transcript.
    pub fn confirm_text(&mut self) -> Result<&ClassificationResult, FormError> {
        self.require_step(QuickStep::Transcription, "confirm the text")?;
        if self.transcript.is_empty() {
            return Err(FormError::EmptyTranscript);
        }
        let result = self.classifier.classify(self.transcript.text());
        info!(subject = %result.subject_id, confidence = %result.confidence, "quick mode classified");
        self.set_step(QuickStep::Classification);
        Ok(&*self.classification.insert(result))
    }

    /// Issue a local protocol and record it under the suggested subject.
    pub fn finish(&mut self) -> Result<&str, FormError> {
        self.require_step(QuickStep::Classification, "finish")?;
        let protocol = generate_protocol();
        if let Some(c) = &self.classification {
            self.registry.save(ProtocolRecord::new(
                protocol.as_str(),
                c.subject_label.as_str(),
                c.suggested_agency.as_str(),
                Channel::Audio,
            ));
        }
        info!(%protocol, "quick mode protocol issued");
        self.set_step(QuickStep::Done);
        Ok(self.protocol.insert(protocol).as_str())
    }

    fn require_step(&self, step: QuickStep, action: &'static str) -> Result<(), FormError> {
        if self.step == step {
            Ok(())
        } else {
            Err(FormError::OutOfOrder {
                action,
                step: self.step,
            })
        }
    }

    fn set_step(&mut self, step: QuickStep) {
        self.step = step;
        self.viewport.scroll_to_top();
        self.viewport.focus_main_content();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::NoopViewport;
    use participa_classify::Confidence;
    use participa_core::is_valid_protocol;
    use participa_store::MemoryStore;
    use std::sync::Arc;

    fn session() -> QuickVoiceSession<NoopViewport> {
        let registry = ProtocolRegistry::new(Arc::new(MemoryStore::new()));
        QuickVoiceSession::new(registry, NoopViewport)
    }

    // ── Transcript ──

    #[test]
    fn final_segments_get_trailing_space() {
        let mut t = TranscriptBuffer::default();
        t.push_final("buraco na pista");
        t.set_interim("perto da");
        assert_eq!(t.text(), "buraco na pista ");
        assert_eq!(t.live(), "buraco na pista perto da");
        t.set_interim("perto da escola");
        t.push_final("perto da escola");
        t.finish();
        assert_eq!(t.text(), "buraco na pista perto da escola");
        assert_eq!(t.live(), t.text());
    }

    // ── Timer ──

    #[test]
    fn timer_stops_at_limit() {
        let mut timer = RecordingTimer::default();
        timer.start();
        for i in 1..MAX_AUDIO_SECS {
            assert_eq!(timer.tick(), Tick::Running(i));
        }
        assert_eq!(timer.tick(), Tick::LimitReached);
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(), MAX_AUDIO_SECS);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.to_string(), "2:00 / 2:00");
    }

    #[test]
    fn duration_format() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
    }

    // ── Session ──

    #[test]
    fn full_flow_records_audio_protocol() {
        let mut s = session();
        s.start_recording().unwrap();
        s.push_interim("minha consulta");
        s.push_final("minha consulta no hospital foi cancelada");
        s.push_final("e o médico não avisou");
        for _ in 0..5 {
            assert!(!s.tick());
        }
        s.stop_recording(Some(Attachment::new("gravacao.webm", "audio/webm", vec![1])));
        assert_eq!(s.recording().unwrap().duration_secs, Some(5));
        assert_eq!(
            s.transcript().text(),
            "minha consulta no hospital foi cancelada e o médico não avisou"
        );

        s.edit_transcript().unwrap();
        assert_eq!(s.step(), QuickStep::EditTranscript);
        s.review_transcript().unwrap();

        let result = s.confirm_text().unwrap();
        assert_eq!(result.subject_id, "saude");
        assert_eq!(result.confidence, Confidence::Alta);

        let protocol = s.finish().unwrap().to_string();
        assert!(is_valid_protocol(&protocol));
        assert_eq!(s.step(), QuickStep::Done);

        let records = s.registry.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].protocol, protocol);
        assert_eq!(records[0].channel, Channel::Audio);
        assert_eq!(records[0].subject_label, "Saúde");
    }

    #[test]
    fn edited_transcript_is_classified() {
        let mut s = session();
        s.start_recording().unwrap();
        s.push_final("abc");
        s.stop_recording(None);
        s.edit_transcript().unwrap();
        s.set_transcript("ônibus atrasado e semáforo quebrado");
        s.review_transcript().unwrap();
        assert_eq!(s.confirm_text().unwrap().subject_id, "transito");
    }

    #[test]
    fn limit_stops_recording() {
        let mut s = session();
        s.start_recording().unwrap();
        s.push_final("fala");
        let stopped = (0..MAX_AUDIO_SECS).any(|_| s.tick());
        assert!(stopped);
        assert!(!s.is_recording());
        s.push_final("ignorado");
        assert_eq!(s.transcript().text(), "fala");
    }

    #[test]
    fn out_of_order_actions_rejected() {
        let mut s = session();
        s.start_recording().unwrap();
        assert_eq!(s.edit_transcript(), Err(FormError::StillRecording));
        assert!(matches!(s.finish(), Err(FormError::OutOfOrder { .. })));
        s.stop_recording(None);
        s.edit_transcript().unwrap();
        assert!(matches!(
            s.start_recording(),
            Err(FormError::OutOfOrder {
                step: QuickStep::EditTranscript,
                ..
            })
        ));
        s.review_transcript().unwrap();
        assert_eq!(s.confirm_text().unwrap_err(), FormError::EmptyTranscript);
    }

    #[test]
    fn back_to_edit_keeps_transcript() {
        let mut s = session();
        s.start_recording().unwrap();
        assert!(matches!(
            s.back_to_edit(),
            Err(FormError::OutOfOrder { step: QuickStep::Recording, .. })
        ));
        s.push_final("ônibus atrasado");
        s.stop_recording(None);
        s.edit_transcript().unwrap();
        s.review_transcript().unwrap();

        s.back_to_edit().unwrap();
        assert_eq!(s.step(), QuickStep::EditTranscript);
        assert_eq!(s.transcript().text(), "ônibus atrasado");

        s.set_transcript("ônibus atrasado e semáforo quebrado");
        s.review_transcript().unwrap();
        assert_eq!(s.confirm_text().unwrap().subject_id, "transito");
    }

    #[test]
    fn restart_clears_everything() {
        let mut s = session();
        s.start_recording().unwrap();
        s.push_final("texto");
        s.tick();
        s.stop_recording(None);
        s.edit_transcript().unwrap();
        s.restart();
        assert_eq!(s.step(), QuickStep::Recording);
        assert!(s.transcript().is_empty());
        assert_eq!(s.timer().elapsed(), 0);
        assert!(s.classification().is_none());
    }
}
