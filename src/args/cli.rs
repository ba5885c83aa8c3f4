use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::ui::OutputFormat;

use super::parsers::parse_duration_arg;
use super::types::HealthTarget;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Operator console for the Integration Test Server - trigger crashes, CPU/RAM pressure, transfers, outbound probes and database checks, and see the outcome."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the Integration Test Server
    #[arg(long, env = "ITSCTL_SERVER", global = true)]
    pub server: Option<String>,

    /// Basic auth user for the server
    #[arg(long, env = "ITSCTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Basic auth password for the server
    #[arg(long, env = "ITSCTL_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Accept invalid server certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// PEM bundle trusted for the server certificate
    #[arg(long, global = true)]
    pub cacert: Option<PathBuf>,

    /// Timeout for connecting to the server (supports ms/s/m/h)
    #[arg(long = "connect-timeout", value_parser = parse_duration_arg, global = true)]
    pub connect_timeout: Option<Duration>,

    /// Path to config file (TOML or JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output format for the outcome
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Do not draw the transfer progress line
    #[arg(long = "no-progress", global = true)]
    pub no_progress: bool,

    /// Disable coloured output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Make the server exit
    Crash(CrashArgs),
    /// Download generated bytes from the server
    Download(DownloadArgs),
    /// Make the server wait before responding
    Sleep(SleepArgs),
    /// Make the server respond with a given status code
    StatusCode(StatusCodeArgs),
    /// Upload a file to the server
    Upload(UploadArgs),
    /// Load the server CPU
    CpuLoad(CpuLoadArgs),
    /// Stop the CPU load
    CpuReset,
    /// Allocate memory on the server
    RamIncrease(RamSizeArgs),
    /// Release memory on the server
    RamDecrease(RamSizeArgs),
    /// Make the server leak memory periodically
    RamLeak(RamLeakArgs),
    /// Stop the memory leak and release leaked memory
    RamReset,
    /// Show server memory usage
    RamStatus,
    /// Query or configure a health-check route
    Health(HealthArgs),
    /// Make the server connect to a database
    DbConnect(DatabaseArgs),
    /// Make the server run a query on a database
    DbQuery(DbQueryArgs),
    /// Make the server ping a host
    Ping(PingArgs),
    /// Make the server issue an HTTP or websocket request
    Request(RequestArgs),
    /// Make the server open a TCP connection
    Tcp(TcpArgs),
    /// Probe a URL directly from this machine (CORS/connectivity check)
    Probe(ProbeArgs),
    /// Print the option sections active for a command
    Sections(SectionsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CrashArgs {
    /// Exit code of the server process
    #[arg(long)]
    pub code: Option<String>,
    /// Delay before crashing (e.g. 5s)
    #[arg(long)]
    pub timeout: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct DownloadArgs {
    /// Number of bytes to download
    #[arg(long)]
    pub size: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SleepArgs {
    /// How long the server sleeps (e.g. 2s)
    #[arg(long)]
    pub duration: Option<String>,
    /// Status code returned after sleeping (100 - 599)
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct StatusCodeArgs {
    /// Status code to respond with (100 - 599)
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct UploadArgs {
    /// File to upload
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CpuLoadArgs {
    /// Number of busy threads
    #[arg(long)]
    pub threads: Option<String>,
    /// How long to keep the CPU busy (e.g. 30s)
    #[arg(long)]
    pub timeout: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RamSizeArgs {
    /// Number of bytes
    #[arg(long)]
    pub size: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RamLeakArgs {
    /// Bytes leaked per tick
    #[arg(long)]
    pub size: Option<String>,
    /// Interval between leaks (e.g. 1s)
    #[arg(long)]
    pub frequency: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct HealthArgs {
    #[command(subcommand)]
    pub action: HealthAction,
}

#[derive(Debug, Subcommand, Clone)]
pub enum HealthAction {
    /// Call a health-check route
    Get {
        #[arg(value_enum)]
        endpoint: HealthTarget,
    },
    /// Configure how a health-check route answers
    Set(HealthSetArgs),
}

#[derive(Debug, Args, Clone)]
pub struct HealthSetArgs {
    #[arg(value_enum)]
    pub endpoint: HealthTarget,
    /// Make the route fail
    #[arg(long)]
    pub fail: bool,
    /// Number of failing answers before recovering
    #[arg(long)]
    pub failures: Option<String>,
    /// Delay before the route starts failing (e.g. 10s)
    #[arg(long)]
    pub delay: Option<String>,
}

/// TLS material sent to the server for an outbound connection.
#[derive(Debug, Args, Clone, Default)]
pub struct TlsArgs {
    /// Skip certificate verification on the outbound connection
    #[arg(long = "tls-insecure")]
    pub tls_insecure: bool,
    /// CA certificate for the outbound connection
    #[arg(long = "tls-ca")]
    pub tls_ca: Option<PathBuf>,
    /// Client certificate (requires --tls-key)
    #[arg(long = "tls-cert")]
    pub tls_cert: Option<PathBuf>,
    /// Client key (requires --tls-cert)
    #[arg(long = "tls-key")]
    pub tls_key: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct DatabaseArgs {
    /// Database engine (postgres, mysql, sqlserver)
    #[arg(long)]
    pub engine: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<String>,
    /// Database user
    #[arg(long = "db-username")]
    pub username: Option<String>,
    /// Database password
    #[arg(long = "db-password")]
    pub password: Option<String>,
    #[arg(long = "db-name")]
    pub db_name: Option<String>,
    /// Use TLS for the database connection
    #[arg(long)]
    pub tls: bool,
    /// SSL mode (postgres: require, verify-ca, verify-full)
    #[arg(long = "ssl-mode")]
    pub ssl_mode: Option<String>,
    #[command(flatten)]
    pub tls_options: TlsArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DbQueryArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
    /// Query to run
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct PingArgs {
    /// Host name or IP to ping
    #[arg(long)]
    pub host: Option<String>,
    /// Number of echo requests
    #[arg(long)]
    pub count: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RequestArgs {
    /// Target URL (http://, https://, ws:// or wss://)
    #[arg(long)]
    pub url: Option<String>,
    /// HTTP method (ignored for websocket URLs)
    #[arg(long)]
    pub method: Option<String>,
    /// Connection timeout used by the server (e.g. 5s)
    #[arg(long = "connection-timeout")]
    pub connection_timeout: Option<String>,
    /// Echo the response headers
    #[arg(long = "echo-headers")]
    pub echo_headers: bool,
    /// Echo the response body
    #[arg(long = "echo-body")]
    pub echo_body: bool,
    #[command(flatten)]
    pub tls_options: TlsArgs,
    /// Go through an upstream proxy
    #[arg(long)]
    pub proxy: bool,
    #[arg(long = "proxy-url")]
    pub proxy_url: Option<String>,
    #[arg(long = "proxy-username")]
    pub proxy_username: Option<String>,
    #[arg(long = "proxy-password")]
    pub proxy_password: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct TcpArgs {
    /// Target as host:port, without scheme
    #[arg(long)]
    pub host: Option<String>,
    /// Connection timeout used by the server (e.g. 5s)
    #[arg(long = "connection-timeout")]
    pub connection_timeout: Option<String>,
    /// Read the first bytes sent by the peer
    #[arg(long = "echo-body")]
    pub echo_body: bool,
    /// Number of bytes to read
    #[arg(long = "echo-body-size")]
    pub echo_body_size: Option<String>,
    /// Wrap the connection in TLS
    #[arg(long)]
    pub tls: bool,
    #[command(flatten)]
    pub tls_options: TlsArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ProbeArgs {
    /// HTTP method
    #[arg(long, default_value = "GET")]
    pub method: String,
    /// URL to probe (http://, https://, ws:// or wss://)
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SectionsArgs {
    #[command(subcommand)]
    pub target: SectionsTarget,
}

#[derive(Debug, Subcommand, Clone)]
pub enum SectionsTarget {
    DbConnect(DatabaseArgs),
    DbQuery(DbQueryArgs),
    Request(RequestArgs),
    Tcp(TcpArgs),
}
