use std::time::Duration;

use async_trait::async_trait;

use crate::domain::RequestDescriptor;
use crate::error::HttpError;

use super::ProgressCallback;

/// Response obtained from the server (or from a probed URL).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseData {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Response text; empty for a streamed download.
    pub body: String,
    /// Bytes moved by the transfer body, upload or download.
    pub transferred: u64,
    /// Set when the body stream broke after the status was received.
    pub interrupted: Option<String>,
    /// Time from sending the request until the body was consumed.
    pub elapsed: Option<Duration>,
}

/// How a dispatched attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Response(ResponseData),
    /// The websocket opened and was closed again.
    ProbeOpened,
    /// No status code was obtained.
    Unreachable { reason: String },
}

/// Carries one descriptor to its target.
///
/// Transport failures are values (`Completion::Unreachable`); `Err` is
/// reserved for local problems that prevented the attempt altogether.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        progress: Option<&ProgressCallback>,
    ) -> Result<Completion, HttpError>;
}
