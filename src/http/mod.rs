//! Transport executor: dispatches descriptors and classifies the result.
mod client;
mod execute;
mod probe;
mod progress;
mod sender;
mod transport;

#[cfg(test)]
mod tests;

pub use client::{DEFAULT_USER_AGENT, ServerSettings};
pub use execute::{execute, run};
pub use progress::{ProgressCallback, ProgressEvent, TransferProgress};
pub use sender::HttpTransport;
pub use transport::{Completion, ResponseData, Transport};

#[cfg(test)]
pub(crate) use probe::PROBE_CLOSE_REASON;
