//! Raw operator input, keyed by option name.
//!
//! Values are read once per invocation and never validated here; the
//! assembler owns the list of options each command reads and ignores the
//! rest.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::HttpError;

/// Option names read by the assembler.
pub mod keys {
    pub const CODE: &str = "code";
    pub const TIMEOUT: &str = "timeout";
    pub const SIZE: &str = "size";
    pub const DURATION: &str = "duration";
    pub const FILE: &str = "file";
    pub const THREADS: &str = "threads";
    pub const FREQUENCY: &str = "frequency";
    pub const FAIL: &str = "fail";
    pub const FAILURES: &str = "failures";
    pub const DELAY: &str = "delay";
    pub const ENGINE: &str = "engine";
    pub const HOST: &str = "host";
    pub const PORT: &str = "port";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const DB_NAME: &str = "db_name";
    pub const QUERY: &str = "query";
    pub const COUNT: &str = "count";
    pub const URL: &str = "url";
    pub const METHOD: &str = "method";
    pub const CONNECTION_TIMEOUT: &str = "connection_timeout";
    pub const ECHO_HEADERS: &str = "echo_headers";
    pub const ECHO_BODY: &str = "echo_body";
    pub const ECHO_BODY_SIZE: &str = "echo_body_size";
    pub const TLS: &str = "tls";
    pub const SSL_MODE: &str = "ssl_mode";
    pub const TLS_INSECURE: &str = "tls_insecure";
    pub const TLS_CA: &str = "tls_ca";
    pub const TLS_CERT: &str = "tls_cert";
    pub const TLS_KEY: &str = "tls_key";
    pub const PROXY: &str = "proxy";
    pub const PROXY_URL: &str = "proxy_url";
    pub const PROXY_USERNAME: &str = "proxy_username";
    pub const PROXY_PASSWORD: &str = "proxy_password";
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttachmentSource {
    Path(PathBuf),
    Memory(Bytes),
}

/// Handle to binary content selected by the operator (upload file, TLS
/// material). Content is only read when the request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    source: AttachmentSource,
}

impl Attachment {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|value| value.to_str())
            .unwrap_or("file")
            .to_owned();
        Self {
            file_name,
            source: AttachmentSource::Path(path),
        }
    }

    pub fn from_bytes(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            source: AttachmentSource::Memory(content.into()),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            AttachmentSource::Path(path) => Some(path),
            AttachmentSource::Memory(_) => None,
        }
    }

    /// Reads the full content.
    ///
    /// # Errors
    ///
    /// Returns an error when a file-backed attachment cannot be read.
    pub async fn read(&self) -> Result<Bytes, HttpError> {
        match &self.source {
            AttachmentSource::Memory(content) => Ok(content.clone()),
            AttachmentSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|err| HttpError::ReadAttachment {
                    path: path.clone(),
                    source: err,
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Flag(bool),
    Files(Vec<Attachment>),
}

/// Mapping from option name to raw value for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, OptionValue::Text(value.into()));
        self
    }

    #[must_use]
    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.insert(name, OptionValue::Flag(value));
        self
    }

    #[must_use]
    pub fn with_file(mut self, name: &str, attachment: Attachment) -> Self {
        match self.values.get_mut(name) {
            Some(OptionValue::Files(files)) => files.push(attachment),
            Some(OptionValue::Text(_) | OptionValue::Flag(_)) | None => {
                self.insert(name, OptionValue::Files(vec![attachment]));
            }
        }
        self
    }

    /// Raw text of an option; absent and non-text options read as empty.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(OptionValue::Text(value)) => value,
            Some(OptionValue::Flag(_) | OptionValue::Files(_)) | None => "",
        }
    }

    /// Flag value; absent options read as `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(OptionValue::Flag(true)))
    }

    #[must_use]
    pub fn files(&self, name: &str) -> &[Attachment] {
        match self.values.get(name) {
            Some(OptionValue::Files(files)) => files,
            Some(OptionValue::Text(_) | OptionValue::Flag(_)) | None => &[],
        }
    }

    /// First selected file, if any.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&Attachment> {
        self.files(name).first()
    }

    /// Whether the operator supplied something meaningful for the option.
    #[must_use]
    pub fn is_supplied(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(OptionValue::Text(value)) => !value.is_empty(),
            Some(OptionValue::Flag(value)) => *value,
            Some(OptionValue::Files(files)) => !files.is_empty(),
            None => false,
        }
    }
}
