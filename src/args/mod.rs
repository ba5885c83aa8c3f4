//! CLI argument types and their mapping onto raw command options.
mod cli;
mod options;
pub(crate) mod parsers;
mod types;


pub use cli::{
    CliArgs, Command, CpuLoadArgs, CrashArgs, DatabaseArgs, DbQueryArgs, DownloadArgs,
    HealthAction, HealthArgs, HealthSetArgs, PingArgs, ProbeArgs, RamLeakArgs, RamSizeArgs,
    RequestArgs, SectionsArgs, SectionsTarget, SleepArgs, StatusCodeArgs, TcpArgs, TlsArgs,
    UploadArgs,
};
pub use options::Invocation;
pub use parsers::parse_duration;
pub use types::HealthTarget;
