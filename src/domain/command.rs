use serde::Serialize;

use super::HttpMethod;

/// Health-check route exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthEndpoint {
    Started,
    Alive,
    Ready,
}

impl HealthEndpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            HealthEndpoint::Started => "/started",
            HealthEndpoint::Alive => "/alive",
            HealthEndpoint::Ready => "/ready",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HealthEndpoint::Started => "started",
            HealthEndpoint::Alive => "alive",
            HealthEndpoint::Ready => "ready",
        }
    }
}

/// One capability of the diagnostic server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticCommand {
    Crash,
    Download,
    Sleep,
    StatusCode,
    Upload,
    CpuLoad,
    CpuReset,
    RamIncrease,
    RamDecrease,
    RamLeak,
    RamReset,
    RamStatus,
    HealthGet(HealthEndpoint),
    HealthSet(HealthEndpoint),
    DatabaseConnect,
    DatabaseQuery,
    Ping,
    HttpRequest,
    TcpProbe,
    CorsProbe,
}

impl DiagnosticCommand {
    /// Server route for the command. The CORS probe targets an arbitrary URL
    /// instead of the diagnostic server.
    #[must_use]
    pub const fn path(self) -> Option<&'static str> {
        match self {
            DiagnosticCommand::Crash => Some("/crash"),
            DiagnosticCommand::Download => Some("/download"),
            DiagnosticCommand::Sleep => Some("/sleep"),
            DiagnosticCommand::StatusCode => Some("/status_code"),
            DiagnosticCommand::Upload => Some("/upload"),
            DiagnosticCommand::CpuLoad => Some("/cpu/load"),
            DiagnosticCommand::CpuReset => Some("/cpu/reset"),
            DiagnosticCommand::RamIncrease => Some("/ram/increase"),
            DiagnosticCommand::RamDecrease => Some("/ram/decrease"),
            DiagnosticCommand::RamLeak => Some("/ram/leak"),
            DiagnosticCommand::RamReset => Some("/ram/reset"),
            DiagnosticCommand::RamStatus => Some("/ram/status"),
            DiagnosticCommand::HealthGet(endpoint) | DiagnosticCommand::HealthSet(endpoint) => {
                Some(endpoint.path())
            }
            DiagnosticCommand::DatabaseConnect => Some("/database/connect"),
            DiagnosticCommand::DatabaseQuery => Some("/database/query"),
            DiagnosticCommand::Ping => Some("/ping"),
            DiagnosticCommand::HttpRequest => Some("/request"),
            DiagnosticCommand::TcpProbe => Some("/tcp"),
            DiagnosticCommand::CorsProbe => None,
        }
    }

    /// Method used against the server. The CORS probe picks its own.
    #[must_use]
    pub const fn method(self) -> HttpMethod {
        match self {
            DiagnosticCommand::Upload
            | DiagnosticCommand::HealthSet(_)
            | DiagnosticCommand::DatabaseConnect
            | DiagnosticCommand::DatabaseQuery
            | DiagnosticCommand::HttpRequest
            | DiagnosticCommand::TcpProbe => HttpMethod::Post,
            DiagnosticCommand::Crash
            | DiagnosticCommand::Download
            | DiagnosticCommand::Sleep
            | DiagnosticCommand::StatusCode
            | DiagnosticCommand::CpuLoad
            | DiagnosticCommand::CpuReset
            | DiagnosticCommand::RamIncrease
            | DiagnosticCommand::RamDecrease
            | DiagnosticCommand::RamLeak
            | DiagnosticCommand::RamReset
            | DiagnosticCommand::RamStatus
            | DiagnosticCommand::HealthGet(_)
            | DiagnosticCommand::Ping
            | DiagnosticCommand::CorsProbe => HttpMethod::Get,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticCommand::Crash => "crash",
            DiagnosticCommand::Download => "download",
            DiagnosticCommand::Sleep => "sleep",
            DiagnosticCommand::StatusCode => "statusCode",
            DiagnosticCommand::Upload => "upload",
            DiagnosticCommand::CpuLoad => "cpuLoad",
            DiagnosticCommand::CpuReset => "cpuReset",
            DiagnosticCommand::RamIncrease => "ramIncrease",
            DiagnosticCommand::RamDecrease => "ramDecrease",
            DiagnosticCommand::RamLeak => "ramLeak",
            DiagnosticCommand::RamReset => "ramReset",
            DiagnosticCommand::RamStatus => "ramStatus",
            DiagnosticCommand::HealthGet(HealthEndpoint::Started) => "startedGet",
            DiagnosticCommand::HealthGet(HealthEndpoint::Alive) => "aliveGet",
            DiagnosticCommand::HealthGet(HealthEndpoint::Ready) => "readyGet",
            DiagnosticCommand::HealthSet(HealthEndpoint::Started) => "startedSet",
            DiagnosticCommand::HealthSet(HealthEndpoint::Alive) => "aliveSet",
            DiagnosticCommand::HealthSet(HealthEndpoint::Ready) => "readySet",
            DiagnosticCommand::DatabaseConnect => "databaseConnect",
            DiagnosticCommand::DatabaseQuery => "databaseQuery",
            DiagnosticCommand::Ping => "ping",
            DiagnosticCommand::HttpRequest => "httpRequest",
            DiagnosticCommand::TcpProbe => "tcpProbe",
            DiagnosticCommand::CorsProbe => "corsProbe",
        }
    }
}

impl std::fmt::Display for DiagnosticCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
