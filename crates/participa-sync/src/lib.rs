//! Submission layer: payload preparation, the endpoint seam with its HTTP
//! implementation, and the adapter that records protocols and applies the
//! demo/strict failure policy.

mod error;
pub use error::SyncError;

pub mod adapter;
pub mod endpoint;
pub mod payload;

#[cfg(feature = "http")]
pub mod http;

pub use adapter::{LOCAL_SUCCESS_MESSAGE, SubmissionAdapter};
pub use endpoint::SubmissionEndpoint;
pub use payload::prepare_payload;

#[cfg(feature = "http")]
pub use http::HttpEndpoint;
