use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use crate::error::HttpError;

pub const DEFAULT_USER_AGENT: &str = concat!("itsctl/", env!("CARGO_PKG_VERSION"));

/// Where the diagnostic server lives and how to reach it.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub base_url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Accept invalid server certificates and host names.
    pub insecure: bool,
    /// PEM bundle trusted for the server certificate.
    pub cacert: Option<PathBuf>,
    /// Client-side connect timeout; requests themselves never time out.
    pub connect_timeout: Option<Duration>,
}

impl ServerSettings {
    /// Settings for `base_url` with no credentials and default TLS.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL does not parse or cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let parsed = Url::parse(base_url).map_err(|err| HttpError::InvalidServerUrl {
            url: base_url.to_owned(),
            source: err,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(HttpError::ServerUrlCannotBeBase {
                url: base_url.to_owned(),
            });
        }
        Ok(Self {
            base_url: parsed,
            username: None,
            password: None,
            insecure: false,
            cacert: None,
            connect_timeout: None,
        })
    }

    /// Absolute URL of a server route, keeping any path prefix of the
    /// base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the route cannot be joined.
    pub fn route_url(&self, route: &str) -> Result<Url, HttpError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        base.join(route.trim_start_matches('/'))
            .map_err(|err| HttpError::JoinUrlFailed {
                url: self.base_url.to_string(),
                path: route.to_owned(),
                source: err,
            })
    }
}

pub(super) fn build_client(settings: &ServerSettings) -> Result<Client, HttpError> {
    let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);

    if let Some(connect_timeout) = settings.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(path) = settings.cacert.as_ref() {
        let bytes = std::fs::read(path).map_err(|err| HttpError::ReadCacert {
            path: path.clone(),
            source: err,
        })?;
        let cert =
            reqwest::Certificate::from_pem(&bytes).map_err(|err| HttpError::InvalidCacert {
                path: path.clone(),
                source: err,
            })?;
        builder = builder.add_root_certificate(cert);
    }

    if settings.insecure {
        debug!("Accepting invalid server certificates");
        builder = builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    builder
        .build()
        .map_err(|err| HttpError::BuildClientFailed { source: err })
}
