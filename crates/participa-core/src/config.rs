//! Runtime configuration.
//!
//! Resolved once at startup (the CLI fills it from flags and environment) and
//! then passed into the store, the submission adapter and the form. Services
//! never read environment variables themselves.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::CoreError;

/// User agent reported in submission metadata.
pub const DEFAULT_USER_AGENT: &str = concat!("participa/", env!("CARGO_PKG_VERSION"));

/// What the submission adapter does when the endpoint cannot be reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitMode {
    /// Mint a local protocol and report success. The citizen never sees the failure.
    #[default]
    Demo,
    /// Return the transport error to the caller.
    Strict,
}

impl SubmitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for SubmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmitMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(Self::Demo),
            "strict" => Ok(Self::Strict),
            other => Err(CoreError::UnknownSubmitMode(other.to_string())),
        }
    }
}

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct Config {
    data_dir: PathBuf,
    endpoint: Option<String>,
    submit_mode: SubmitMode,
    accessibility_mode: bool,
    user_agent: String,
}

impl Config {
    /// Create a new `Config`.
    ///
    /// `endpoint`, when given, must be an `http://` or `https://` URL; a
    /// trailing slash is removed.
    pub fn new(
        data_dir: PathBuf,
        endpoint: Option<String>,
        submit_mode: SubmitMode,
    ) -> Result<Self, CoreError> {
        if data_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidConfig("data_dir cannot be empty".into()));
        }

        let endpoint = match endpoint.map(|e| e.trim().to_string()) {
            None => None,
            Some(e) if e.is_empty() => None,
            Some(e) if e.starts_with("http://") || e.starts_with("https://") => {
                Some(e.trim_end_matches('/').to_string())
            }
            Some(e) => {
                return Err(CoreError::InvalidConfig(format!(
                    "endpoint must be an http(s) URL, got '{e}'"
                )));
            }
        };

        Ok(Self {
            data_dir,
            endpoint,
            submit_mode,
            accessibility_mode: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn with_accessibility_mode(mut self, enabled: bool) -> Self {
        self.accessibility_mode = enabled;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn submit_mode(&self) -> SubmitMode {
        self.submit_mode
    }

    pub fn accessibility_mode(&self) -> bool {
        self.accessibility_mode
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_mode_parses() {
        assert_eq!("demo".parse::<SubmitMode>().unwrap(), SubmitMode::Demo);
        assert_eq!("STRICT".parse::<SubmitMode>().unwrap(), SubmitMode::Strict);
        assert!("lenient".parse::<SubmitMode>().is_err());
        assert_eq!(SubmitMode::default(), SubmitMode::Demo);
    }

    #[test]
    fn endpoint_trailing_slash_trimmed() {
        let cfg = Config::new(
            ".participa".into(),
            Some("http://localhost:3000/api/submit/".into()),
            SubmitMode::Demo,
        )
        .unwrap();
        assert_eq!(cfg.endpoint(), Some("http://localhost:3000/api/submit"));
    }

    #[test]
    fn blank_endpoint_means_none() {
        let cfg = Config::new(".participa".into(), Some("  ".into()), SubmitMode::Strict).unwrap();
        assert!(cfg.endpoint().is_none());
        assert_eq!(cfg.submit_mode(), SubmitMode::Strict);
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = Config::new(".participa".into(), Some("ftp://x".into()), SubmitMode::Demo);
        assert!(matches!(err, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_empty_data_dir() {
        let err = Config::new(PathBuf::new(), None, SubmitMode::Demo);
        assert!(matches!(err, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn builder_options() {
        let cfg = Config::new(".participa".into(), None, SubmitMode::Demo)
            .unwrap()
            .with_accessibility_mode(true)
            .with_user_agent("test-agent");
        assert!(cfg.accessibility_mode());
        assert_eq!(cfg.user_agent(), "test-agent");
        assert!(DEFAULT_USER_AGENT.starts_with("participa/"));
    }
}
