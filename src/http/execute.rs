use tokio::time::Instant;
use tracing::{debug, warn};

use crate::assemble::assemble;
use crate::domain::{DiagnosticCommand, OptionSet, RequestDescriptor};
use crate::outcome::{Outcome, classify};

use super::{ProgressCallback, Transport};

/// Dispatches `descriptor` once and classifies the result.
///
/// Transfer timing comes from the transport when it measured the exchange
/// itself; otherwise the whole dispatch is timed here. Progress events, if
/// any, are delivered before the outcome is returned.
pub async fn execute(
    transport: &dyn Transport,
    descriptor: &RequestDescriptor,
    progress: Option<&ProgressCallback>,
) -> Outcome {
    let started = Instant::now();
    match transport.dispatch(descriptor, progress).await {
        Ok(completion) => classify(descriptor, completion, started.elapsed()),
        Err(err) => {
            warn!("{} was not dispatched: {}", descriptor.command(), err);
            Outcome::local_failure(descriptor.command(), err.to_string())
        }
    }
}

/// Assembles and executes `command`. A rejected command never reaches the
/// transport.
pub async fn run(
    transport: &dyn Transport,
    command: DiagnosticCommand,
    options: &OptionSet,
    progress: Option<&ProgressCallback>,
) -> Outcome {
    match assemble(command, options) {
        Ok(descriptor) => execute(transport, &descriptor, progress).await,
        Err(rejection) => {
            debug!("{} rejected: {}", command, rejection);
            Outcome::rejected(command, &rejection)
        }
    }
}
