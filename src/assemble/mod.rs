//! Request assembly: raw options in, validated descriptor or rejection out.
//!
//! Validators run in the order the options are presented to the operator
//! and the first failure wins. Nothing is dispatched for a rejected command,
//! and a partially built descriptor never escapes.
mod basic;
mod database;
mod outbound;
mod tls;
pub mod validators;


use tracing::debug;

use crate::domain::{DiagnosticCommand, OptionSet, Report, RequestDescriptor};
use crate::error::ValidationError;

/// Local validation failure; never leaves the engine.
pub type Rejection = ValidationError;

/// Builds the descriptor for `command` from raw `options`.
///
/// The result depends only on its inputs.
///
/// # Errors
///
/// Returns the first validator rejection for the command.
pub fn assemble(
    command: DiagnosticCommand,
    options: &OptionSet,
) -> Result<RequestDescriptor, Rejection> {
    debug!("Assembling {}", command);
    match command {
        DiagnosticCommand::Crash => basic::crash(options),
        DiagnosticCommand::Download => basic::download(options),
        DiagnosticCommand::Sleep => basic::sleep(options),
        DiagnosticCommand::StatusCode => basic::status_code_command(options),
        DiagnosticCommand::Upload => basic::upload(options),
        DiagnosticCommand::CpuLoad => basic::cpu_load(options),
        DiagnosticCommand::CpuReset => Ok(basic::fixed(
            command,
            Report::Fixed("server CPU load reset"),
        )),
        DiagnosticCommand::RamIncrease => basic::ram_increase(options),
        DiagnosticCommand::RamDecrease => basic::ram_decrease(options),
        DiagnosticCommand::RamLeak => Ok(basic::ram_leak(options)),
        DiagnosticCommand::RamReset => Ok(basic::fixed(
            command,
            Report::MessageWithBody("server memory leak reset"),
        )),
        DiagnosticCommand::RamStatus => Ok(basic::fixed(command, Report::Body)),
        DiagnosticCommand::HealthGet(endpoint) => Ok(basic::health_get(endpoint)),
        DiagnosticCommand::HealthSet(endpoint) => basic::health_set(endpoint, options),
        DiagnosticCommand::DatabaseConnect => database::connect(options),
        DiagnosticCommand::DatabaseQuery => database::query(options),
        DiagnosticCommand::Ping => basic::ping(options),
        DiagnosticCommand::HttpRequest => outbound::http_request(options),
        DiagnosticCommand::TcpProbe => outbound::tcp_probe(options),
        DiagnosticCommand::CorsProbe => outbound::cors_probe(options),
    }
}
