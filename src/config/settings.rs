use crate::args::{CliArgs, parse_duration};
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::ServerSettings;
use crate::ui::OutputFormat;

use super::types::{ConfigFile, DEFAULT_SERVER};

/// Everything the binary needs besides the command itself.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub server: ServerSettings,
    pub format: OutputFormat,
}

/// Merges CLI flags over config values over defaults.
///
/// # Errors
///
/// Returns an error when the server URL or the configured connect timeout
/// is invalid.
pub fn resolve_settings(args: &CliArgs, config: Option<&ConfigFile>) -> AppResult<ResolvedSettings> {
    let defaults = ConfigFile::default();
    let config = config.unwrap_or(&defaults);

    let base_url = args
        .server
        .as_deref()
        .or(config.server.as_deref())
        .unwrap_or(DEFAULT_SERVER);
    let mut server = ServerSettings::new(base_url)?;

    server.username = args.username.clone().or_else(|| config.username.clone());
    server.password = args.password.clone().or_else(|| config.password.clone());
    server.insecure = args.insecure || config.insecure.unwrap_or(false);
    server.cacert = args.cacert.clone().or_else(|| config.cacert.clone());
    server.connect_timeout = match (args.connect_timeout, config.connect_timeout.as_deref()) {
        (Some(timeout), _) => Some(timeout),
        (None, Some(raw)) => Some(parse_duration(raw).map_err(|err| {
            AppError::config(ConfigError::InvalidConnectTimeout { source: err })
        })?),
        (None, None) => None,
    };

    let format = args.format.or(config.format).unwrap_or_default();
    Ok(ResolvedSettings { server, format })
}
