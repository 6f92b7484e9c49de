use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("unknown submit mode: {0} (expected 'demo' or 'strict')")]
    UnknownSubmitMode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
