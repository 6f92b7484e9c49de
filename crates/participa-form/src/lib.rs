//! Manifestation wizard: step model, validation gates, the form controller
//! with draft persistence, and the quick voice mode flow.

mod error;
pub use error::FormError;

pub mod controller;
pub mod quick;
pub mod step;
pub mod validation;
pub mod viewport;

pub use controller::{FormController, FormDraft};
pub use quick::{QuickStep, QuickVoiceSession, RecordingTimer, TranscriptBuffer};
pub use step::{FORM_STEPS, FormStepInfo, Step, progress_percent};
pub use validation::{Field, FieldErrors, validate_submission};
pub use viewport::{NoopViewport, Viewport};
