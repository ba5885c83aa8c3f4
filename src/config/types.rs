use std::path::PathBuf;

use serde::Deserialize;

use crate::ui::OutputFormat;

pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Contents of `itsctl.toml` / `itsctl.json`. Every key is optional and
/// overridden by the matching CLI flag.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: Option<bool>,
    pub cacert: Option<PathBuf>,
    /// Duration string, e.g. `5s`.
    pub connect_timeout: Option<String>,
    pub format: Option<OutputFormat>,
}
