//! Maps parsed subcommands onto the raw option set read by the assembler.
use std::path::Path;

use crate::domain::options::keys;
use crate::domain::{Attachment, DiagnosticCommand, OptionSet};

use super::cli::{
    Command, CrashArgs, DatabaseArgs, DbQueryArgs, HealthAction, RequestArgs, SectionsTarget,
    TcpArgs, TlsArgs,
};

/// A command ready for the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: DiagnosticCommand,
    pub options: OptionSet,
}

impl Invocation {
    const fn new(command: DiagnosticCommand, options: OptionSet) -> Self {
        Self { command, options }
    }
}

fn text(options: OptionSet, name: &str, value: Option<&String>) -> OptionSet {
    match value {
        Some(value) => options.with_text(name, value.clone()),
        None => options,
    }
}

fn file(options: OptionSet, name: &str, path: Option<&Path>) -> OptionSet {
    match path {
        Some(path) => options.with_file(name, Attachment::from_path(path)),
        None => options,
    }
}

fn tls_material(options: OptionSet, tls: &TlsArgs) -> OptionSet {
    let options = options.with_flag(keys::TLS_INSECURE, tls.tls_insecure);
    let options = file(options, keys::TLS_CA, tls.tls_ca.as_deref());
    let options = file(options, keys::TLS_CERT, tls.tls_cert.as_deref());
    file(options, keys::TLS_KEY, tls.tls_key.as_deref())
}

fn crash_options(args: &CrashArgs) -> OptionSet {
    let options = text(OptionSet::new(), keys::CODE, args.code.as_ref());
    text(options, keys::TIMEOUT, args.timeout.as_ref())
}

fn database_options(args: &DatabaseArgs) -> OptionSet {
    let options = text(OptionSet::new(), keys::ENGINE, args.engine.as_ref());
    let options = text(options, keys::HOST, args.host.as_ref());
    let options = text(options, keys::PORT, args.port.as_ref());
    let options = text(options, keys::USERNAME, args.username.as_ref());
    let options = text(options, keys::PASSWORD, args.password.as_ref());
    let options = text(options, keys::DB_NAME, args.db_name.as_ref());
    let options = options.with_flag(keys::TLS, args.tls);
    let options = text(options, keys::SSL_MODE, args.ssl_mode.as_ref());
    tls_material(options, &args.tls_options)
}

fn query_options(args: &DbQueryArgs) -> OptionSet {
    text(
        database_options(&args.database),
        keys::QUERY,
        args.query.as_ref(),
    )
}

fn request_options(args: &RequestArgs) -> OptionSet {
    let options = text(OptionSet::new(), keys::URL, args.url.as_ref());
    let options = text(options, keys::METHOD, args.method.as_ref());
    let options = text(
        options,
        keys::CONNECTION_TIMEOUT,
        args.connection_timeout.as_ref(),
    );
    let options = options
        .with_flag(keys::ECHO_HEADERS, args.echo_headers)
        .with_flag(keys::ECHO_BODY, args.echo_body);
    let options = tls_material(options, &args.tls_options);
    let options = options.with_flag(keys::PROXY, args.proxy);
    let options = text(options, keys::PROXY_URL, args.proxy_url.as_ref());
    let options = text(options, keys::PROXY_USERNAME, args.proxy_username.as_ref());
    text(options, keys::PROXY_PASSWORD, args.proxy_password.as_ref())
}

fn tcp_options(args: &TcpArgs) -> OptionSet {
    let options = text(OptionSet::new(), keys::HOST, args.host.as_ref());
    let options = text(
        options,
        keys::CONNECTION_TIMEOUT,
        args.connection_timeout.as_ref(),
    );
    let options = options.with_flag(keys::ECHO_BODY, args.echo_body);
    let options = text(options, keys::ECHO_BODY_SIZE, args.echo_body_size.as_ref());
    let options = options.with_flag(keys::TLS, args.tls);
    tls_material(options, &args.tls_options)
}

impl SectionsTarget {
    /// Command and option state whose visible sections are requested.
    #[must_use]
    pub fn invocation(&self) -> Invocation {
        match self {
            SectionsTarget::DbConnect(args) => {
                Invocation::new(DiagnosticCommand::DatabaseConnect, database_options(args))
            }
            SectionsTarget::DbQuery(args) => {
                Invocation::new(DiagnosticCommand::DatabaseQuery, query_options(args))
            }
            SectionsTarget::Request(args) => {
                Invocation::new(DiagnosticCommand::HttpRequest, request_options(args))
            }
            SectionsTarget::Tcp(args) => {
                Invocation::new(DiagnosticCommand::TcpProbe, tcp_options(args))
            }
        }
    }
}

impl Command {
    /// The diagnostic command and its raw options, or `None` for commands
    /// that do not talk to a server.
    #[must_use]
    pub fn invocation(&self) -> Option<Invocation> {
        let invocation = match self {
            Command::Crash(args) => Invocation::new(DiagnosticCommand::Crash, crash_options(args)),
            Command::Download(args) => Invocation::new(
                DiagnosticCommand::Download,
                text(OptionSet::new(), keys::SIZE, args.size.as_ref()),
            ),
            Command::Sleep(args) => {
                let options = text(OptionSet::new(), keys::DURATION, args.duration.as_ref());
                Invocation::new(
                    DiagnosticCommand::Sleep,
                    text(options, keys::CODE, args.code.as_ref()),
                )
            }
            Command::StatusCode(args) => Invocation::new(
                DiagnosticCommand::StatusCode,
                text(OptionSet::new(), keys::CODE, args.code.as_ref()),
            ),
            Command::Upload(args) => {
                let options = args.files.iter().fold(OptionSet::new(), |options, path| {
                    options.with_file(keys::FILE, Attachment::from_path(path))
                });
                Invocation::new(DiagnosticCommand::Upload, options)
            }
            Command::CpuLoad(args) => {
                let options = text(OptionSet::new(), keys::THREADS, args.threads.as_ref());
                Invocation::new(
                    DiagnosticCommand::CpuLoad,
                    text(options, keys::TIMEOUT, args.timeout.as_ref()),
                )
            }
            Command::CpuReset => Invocation::new(DiagnosticCommand::CpuReset, OptionSet::new()),
            Command::RamIncrease(args) => Invocation::new(
                DiagnosticCommand::RamIncrease,
                text(OptionSet::new(), keys::SIZE, args.size.as_ref()),
            ),
            Command::RamDecrease(args) => Invocation::new(
                DiagnosticCommand::RamDecrease,
                text(OptionSet::new(), keys::SIZE, args.size.as_ref()),
            ),
            Command::RamLeak(args) => {
                let options = text(OptionSet::new(), keys::SIZE, args.size.as_ref());
                Invocation::new(
                    DiagnosticCommand::RamLeak,
                    text(options, keys::FREQUENCY, args.frequency.as_ref()),
                )
            }
            Command::RamReset => Invocation::new(DiagnosticCommand::RamReset, OptionSet::new()),
            Command::RamStatus => Invocation::new(DiagnosticCommand::RamStatus, OptionSet::new()),
            Command::Health(args) => match &args.action {
                HealthAction::Get { endpoint } => Invocation::new(
                    DiagnosticCommand::HealthGet((*endpoint).into()),
                    OptionSet::new(),
                ),
                HealthAction::Set(set) => {
                    let options = OptionSet::new().with_flag(keys::FAIL, set.fail);
                    let options = text(options, keys::FAILURES, set.failures.as_ref());
                    Invocation::new(
                        DiagnosticCommand::HealthSet(set.endpoint.into()),
                        text(options, keys::DELAY, set.delay.as_ref()),
                    )
                }
            },
            Command::DbConnect(args) => {
                Invocation::new(DiagnosticCommand::DatabaseConnect, database_options(args))
            }
            Command::DbQuery(args) => {
                Invocation::new(DiagnosticCommand::DatabaseQuery, query_options(args))
            }
            Command::Ping(args) => {
                let options = text(OptionSet::new(), keys::HOST, args.host.as_ref());
                Invocation::new(
                    DiagnosticCommand::Ping,
                    text(options, keys::COUNT, args.count.as_ref()),
                )
            }
            Command::Request(args) => {
                Invocation::new(DiagnosticCommand::HttpRequest, request_options(args))
            }
            Command::Tcp(args) => Invocation::new(DiagnosticCommand::TcpProbe, tcp_options(args)),
            Command::Probe(args) => {
                let options = OptionSet::new().with_text(keys::METHOD, args.method.clone());
                Invocation::new(
                    DiagnosticCommand::CorsProbe,
                    text(options, keys::URL, args.url.as_ref()),
                )
            }
            Command::Sections(_) => return None,
        };
        Some(invocation)
    }
}
