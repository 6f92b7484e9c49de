use thiserror::Error;

use crate::quick::QuickStep;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid wizard step: {0}")]
    InvalidStep(u8),

    #[error("cannot {action} during the {step:?} step")]
    OutOfOrder { action: &'static str, step: QuickStep },

    #[error("recording is still in progress")]
    StillRecording,

    #[error("transcript is empty")]
    EmptyTranscript,
}
