use std::collections::BTreeSet;

use serde::Serialize;

use super::options::keys;
use super::{DatabaseEngine, DiagnosticCommand, OptionSet};

/// Option group that is shown to the operator and read by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    Tls,
    TlsInsecure,
    TlsSslMode,
    TlsCa,
    TlsClientCert,
    EchoBodySize,
    Proxy,
}

impl SectionId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SectionId::Tls => "tls",
            SectionId::TlsInsecure => "tls-insecure",
            SectionId::TlsSslMode => "tls-ssl-mode",
            SectionId::TlsCa => "tls-ca",
            SectionId::TlsClientCert => "tls-client-cert",
            SectionId::EchoBodySize => "echo-body-size",
            SectionId::Proxy => "proxy",
        }
    }
}

/// Sections active for the current option state.
///
/// The presentation layer uses this to decide what to show; the assembler
/// uses the same result to decide what to read, so both stay in step.
#[must_use]
pub fn visible_sections(command: DiagnosticCommand, options: &OptionSet) -> BTreeSet<SectionId> {
    let mut sections = BTreeSet::new();
    match command {
        DiagnosticCommand::DatabaseConnect | DiagnosticCommand::DatabaseQuery => {
            if options.flag(keys::TLS) {
                database_tls_sections(options, &mut sections);
            }
        }
        DiagnosticCommand::HttpRequest => {
            let url = options.text(keys::URL).trim();
            if url.starts_with("https://") || url.starts_with("wss://") {
                generic_tls_sections(options, &mut sections);
            }
            if options.flag(keys::PROXY) {
                sections.insert(SectionId::Proxy);
            }
        }
        DiagnosticCommand::TcpProbe => {
            if options.flag(keys::TLS) {
                generic_tls_sections(options, &mut sections);
            }
            if options.flag(keys::ECHO_BODY) {
                sections.insert(SectionId::EchoBodySize);
            }
        }
        DiagnosticCommand::Crash
        | DiagnosticCommand::Download
        | DiagnosticCommand::Sleep
        | DiagnosticCommand::StatusCode
        | DiagnosticCommand::Upload
        | DiagnosticCommand::CpuLoad
        | DiagnosticCommand::CpuReset
        | DiagnosticCommand::RamIncrease
        | DiagnosticCommand::RamDecrease
        | DiagnosticCommand::RamLeak
        | DiagnosticCommand::RamReset
        | DiagnosticCommand::RamStatus
        | DiagnosticCommand::HealthGet(_)
        | DiagnosticCommand::HealthSet(_)
        | DiagnosticCommand::Ping
        | DiagnosticCommand::CorsProbe => {}
    }
    sections
}

fn generic_tls_sections(options: &OptionSet, sections: &mut BTreeSet<SectionId>) {
    sections.insert(SectionId::Tls);
    sections.insert(SectionId::TlsInsecure);
    if !options.flag(keys::TLS_INSECURE) {
        sections.insert(SectionId::TlsCa);
    }
    sections.insert(SectionId::TlsClientCert);
}

fn database_tls_sections(options: &OptionSet, sections: &mut BTreeSet<SectionId>) {
    sections.insert(SectionId::Tls);
    // Unknown engine: the assembler rejects it before TLS matters.
    let Ok(engine) = options.text(keys::ENGINE).parse::<DatabaseEngine>() else {
        return;
    };
    let capabilities = engine.capabilities();
    if capabilities.supports_insecure_flag {
        sections.insert(SectionId::TlsInsecure);
    }
    if capabilities.supports_ssl_mode() {
        sections.insert(SectionId::TlsSslMode);
    }
    if capabilities.allows_ca(
        options.flag(keys::TLS_INSECURE),
        options.text(keys::SSL_MODE).trim(),
    ) {
        sections.insert(SectionId::TlsCa);
    }
    if !capabilities.disables_client_cert {
        sections.insert(SectionId::TlsClientCert);
    }
}
