//! Terminal result of one attempt and the classifier that produces it.
mod classify;


use std::time::Duration;

use serde::Serialize;

use crate::domain::DiagnosticCommand;
use crate::error::ValidationError;
use crate::ui::formatting::{bytes_per_second, format_rate, format_size, format_tenths, ms_to_tenths};

pub use classify::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    /// Server reached, recognized partial success.
    Warning,
    /// Server reached with an unexpected status, or local rejection.
    ApplicationError,
    /// No status code was obtained.
    ConnectionError,
}

impl OutcomeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Warning => "warning",
            OutcomeKind::ApplicationError => "application error",
            OutcomeKind::ConnectionError => "connection error",
        }
    }

    /// Process exit status for the binary.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            OutcomeKind::Success | OutcomeKind::Warning => 0,
            OutcomeKind::ApplicationError => 1,
            OutcomeKind::ConnectionError => 2,
        }
    }
}

/// Measurements derived once, when a transfer completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferMetrics {
    pub bytes: u64,
    pub elapsed_ms: u64,
    pub duration_tenths: u64,
    pub bytes_per_second: u64,
}

impl TransferMetrics {
    #[must_use]
    pub fn measure(bytes: u64, elapsed: Duration) -> Self {
        let elapsed_ms = u64::try_from(elapsed.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);
        Self {
            bytes,
            elapsed_ms,
            duration_tenths: ms_to_tenths(elapsed_ms),
            bytes_per_second: bytes_per_second(bytes, elapsed_ms),
        }
    }

    /// Seconds with one decimal, e.g. `2.5`.
    #[must_use]
    pub fn duration(&self) -> String {
        format_tenths(self.duration_tenths)
    }

    #[must_use]
    pub fn size(&self) -> String {
        format_size(self.bytes)
    }

    #[must_use]
    pub fn throughput(&self) -> String {
        format_rate(self.bytes_per_second)
    }
}

/// Result of one attempt, handed to the presenter and then dropped.
///
/// `message` is written by this crate; `detail` carries server-supplied
/// text and must be sanitized before it reaches an HTML view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub command: DiagnosticCommand,
    pub kind: OutcomeKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<TransferMetrics>,
}

impl Outcome {
    /// Outcome of a command rejected before dispatch.
    #[must_use]
    pub fn rejected(command: DiagnosticCommand, rejection: &ValidationError) -> Self {
        Self {
            command,
            kind: OutcomeKind::ApplicationError,
            message: rejection.to_string(),
            detail: None,
            status: None,
            metrics: None,
        }
    }

    /// Outcome of a local failure after assembly (unreadable attachment,
    /// unbuildable request).
    #[must_use]
    pub fn local_failure(command: DiagnosticCommand, reason: String) -> Self {
        Self {
            command,
            kind: OutcomeKind::ApplicationError,
            message: reason,
            detail: None,
            status: None,
            metrics: None,
        }
    }
}
