use serde::Serialize;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Postgres,
    MySql,
    SqlServer,
}

/// TLS options an engine understands. Read by both the visibility rules and
/// the assembler; a new engine is one row in [`ENGINE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCapabilities {
    /// Engine accepts `tls_insecure`.
    pub supports_insecure_flag: bool,
    /// Accepted `ssl_mode` values; empty when the engine has no SSL mode.
    pub ssl_modes: &'static [&'static str],
    /// SSL mode under which no CA is sent.
    pub ca_suppressed_by_ssl_mode: Option<&'static str>,
    /// Engine refuses client certificates.
    pub disables_client_cert: bool,
}

impl EngineCapabilities {
    #[must_use]
    pub const fn supports_ssl_mode(&self) -> bool {
        !self.ssl_modes.is_empty()
    }

    /// Whether a CA attachment may be sent for the given TLS state.
    #[must_use]
    pub fn allows_ca(&self, insecure: bool, ssl_mode: &str) -> bool {
        if self.supports_insecure_flag && insecure {
            return false;
        }
        if self.supports_ssl_mode() && self.ca_suppressed_by_ssl_mode == Some(ssl_mode) {
            return false;
        }
        true
    }
}

static ENGINE_TABLE: [(DatabaseEngine, EngineCapabilities); 3] = [
    (
        DatabaseEngine::Postgres,
        EngineCapabilities {
            supports_insecure_flag: false,
            ssl_modes: &["require", "verify-ca", "verify-full"],
            ca_suppressed_by_ssl_mode: Some("require"),
            disables_client_cert: false,
        },
    ),
    (
        DatabaseEngine::MySql,
        EngineCapabilities {
            supports_insecure_flag: true,
            ssl_modes: &[],
            ca_suppressed_by_ssl_mode: None,
            disables_client_cert: false,
        },
    ),
    (
        DatabaseEngine::SqlServer,
        EngineCapabilities {
            supports_insecure_flag: true,
            ssl_modes: &[],
            ca_suppressed_by_ssl_mode: None,
            disables_client_cert: true,
        },
    ),
];

static NO_CAPABILITIES: EngineCapabilities = EngineCapabilities {
    supports_insecure_flag: false,
    ssl_modes: &[],
    ca_suppressed_by_ssl_mode: None,
    disables_client_cert: false,
};

impl DatabaseEngine {
    pub const ALL: [DatabaseEngine; 3] = [
        DatabaseEngine::Postgres,
        DatabaseEngine::MySql,
        DatabaseEngine::SqlServer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DatabaseEngine::Postgres => "postgres",
            DatabaseEngine::MySql => "mysql",
            DatabaseEngine::SqlServer => "sqlserver",
        }
    }

    #[must_use]
    pub fn capabilities(self) -> &'static EngineCapabilities {
        ENGINE_TABLE
            .iter()
            .find(|(engine, _)| *engine == self)
            .map_or(&NO_CAPABILITIES, |(_, capabilities)| capabilities)
    }

    fn supported_list() -> String {
        DatabaseEngine::ALL
            .iter()
            .map(|engine| engine.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for DatabaseEngine {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        if normalized.is_empty() {
            return Err(ValidationError::MissingEngine);
        }
        DatabaseEngine::ALL
            .into_iter()
            .find(|engine| engine.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownEngine {
                value: s.to_owned(),
                supported: DatabaseEngine::supported_list(),
            })
    }
}
