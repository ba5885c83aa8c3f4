use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid server URL '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Server URL '{url}' cannot carry a path.")]
    ServerUrlCannotBeBase { url: String },
    #[error("Failed to join URL '{url}' with '{path}': {source}")]
    JoinUrlFailed {
        url: String,
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid probe URL '{url}': {source}")]
    InvalidProbeUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to read cacert '{path}': {source}")]
    ReadCacert {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid cacert '{path}': {source}")]
    InvalidCacert {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read attachment '{path}': {source}")]
    ReadAttachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid method '{method}' for the probe request.")]
    InvalidProbeMethod { method: String },
    #[error("Failed to build request: {source}")]
    BuildRequestFailed {
        #[source]
        source: reqwest::Error,
    },
}
