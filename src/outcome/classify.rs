use std::time::Duration;

use crate::domain::{Report, RequestDescriptor, Target, TransferDirection};
use crate::http::{Completion, ResponseData};

use super::{Outcome, OutcomeKind, TransferMetrics};

const SERVER_UNREACHABLE: &str = "failed to connect to the server";
const WEBSOCKET_OPENED: &str = "websocket successfully connected, closing connection";

/// Maps a finished attempt to its terminal outcome.
///
/// The absence of a status code is the only signal for a connection error;
/// any status obtained from the server is either the expected one, the
/// command's recognized partial status, or an application error.
#[must_use]
pub fn classify(descriptor: &RequestDescriptor, completion: Completion, elapsed: Duration) -> Outcome {
    match completion {
        Completion::Unreachable { reason } => unreachable_outcome(descriptor, reason),
        Completion::ProbeOpened => outcome(
            descriptor,
            OutcomeKind::Success,
            WEBSOCKET_OPENED.to_owned(),
            None,
        ),
        Completion::Response(response) => classify_response(descriptor, response, elapsed),
    }
}

fn unreachable_outcome(descriptor: &RequestDescriptor, reason: String) -> Outcome {
    let message = match descriptor.target() {
        Target::Server(_) => SERVER_UNREACHABLE.to_owned(),
        Target::External(url) => format!("failed to connect to {}", url),
    };
    outcome(
        descriptor,
        OutcomeKind::ConnectionError,
        message,
        non_empty(reason),
    )
}

fn classify_response(
    descriptor: &RequestDescriptor,
    response: ResponseData,
    elapsed: Duration,
) -> Outcome {
    let expectation = descriptor.expectation();
    let status = response.status;
    let elapsed = response.elapsed.unwrap_or(elapsed);

    if expectation.success.matches(status) {
        if let Some(reason) = response.interrupted {
            let mut result = outcome(
                descriptor,
                OutcomeKind::ApplicationError,
                format!("transfer interrupted after {} bytes", response.transferred),
                non_empty(reason),
            );
            result.status = Some(status);
            return result;
        }
        let mut result = success(descriptor, response, elapsed);
        result.status = Some(status);
        return result;
    }

    if expectation.partial == Some(status) {
        let mut result = outcome(
            descriptor,
            OutcomeKind::Warning,
            format!("server responded with partial status code {}", status),
            non_empty(response.body),
        );
        result.status = Some(status);
        return result;
    }

    let (message, detail) = match descriptor.report() {
        Report::StatusLine => (
            format!("incorrect status code: {}", status),
            non_empty(response.body),
        ),
        Report::ProbeResponse => (
            format!("server responded with status: {}", status),
            Some(probe_detail(&response)),
        ),
        Report::Fixed(_)
        | Report::Message(_)
        | Report::MessageWithBody(_)
        | Report::Body
        | Report::Transfer
        | Report::ProbeOpen => (
            format!("server responded with status code {}", status),
            non_empty(response.body),
        ),
    };
    let mut result = outcome(descriptor, OutcomeKind::ApplicationError, message, detail);
    result.status = Some(status);
    result
}

fn success(descriptor: &RequestDescriptor, response: ResponseData, elapsed: Duration) -> Outcome {
    let kind = OutcomeKind::Success;
    match descriptor.report() {
        Report::Fixed(text) => outcome(descriptor, kind, (*text).to_owned(), None),
        Report::Message(text) => outcome(descriptor, kind, text.clone(), None),
        Report::MessageWithBody(text) => {
            outcome(descriptor, kind, (*text).to_owned(), non_empty(response.body))
        }
        Report::Body => outcome(descriptor, kind, response.body, None),
        Report::StatusLine => outcome(
            descriptor,
            kind,
            format!("ok (status code: {})", response.status),
            None,
        ),
        Report::ProbeResponse => {
            let detail = probe_detail(&response);
            outcome(
                descriptor,
                kind,
                format!("server responded with status: {}", response.status),
                Some(detail),
            )
        }
        Report::ProbeOpen => outcome(descriptor, kind, WEBSOCKET_OPENED.to_owned(), None),
        Report::Transfer => {
            let metrics = TransferMetrics::measure(response.transferred, elapsed);
            let verb = match descriptor.transfer() {
                Some(TransferDirection::Upload) => "uploaded",
                Some(TransferDirection::Download) | None => "downloaded",
            };
            let message = format!(
                "{} {} in {} seconds ({})",
                metrics.size(),
                verb,
                metrics.duration(),
                metrics.throughput()
            );
            let mut result = outcome(descriptor, kind, message, None);
            result.metrics = Some(metrics);
            result
        }
    }
}

fn probe_detail(response: &ResponseData) -> String {
    let mut lines = vec!["Response headers:".to_owned()];
    lines.extend(
        response
            .headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value)),
    );
    lines.push(String::new());
    if response.body.is_empty() {
        lines.push("No content".to_owned());
    } else {
        lines.push("Content:".to_owned());
        lines.push(response.body.clone());
    }
    lines.join("\n")
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn outcome(
    descriptor: &RequestDescriptor,
    kind: OutcomeKind,
    message: String,
    detail: Option<String>,
) -> Outcome {
    Outcome {
        command: descriptor.command(),
        kind,
        message,
        detail,
        status: None,
        metrics: None,
    }
}
