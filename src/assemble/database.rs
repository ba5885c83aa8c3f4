use tracing::debug;

use crate::domain::options::keys;
use crate::domain::{
    DatabaseEngine, DescriptorBuilder, DiagnosticCommand, OptionSet, Report, RequestDescriptor,
    SectionId, visible_sections,
};
use crate::error::ValidationError;

use super::tls::{FIELD_TLS_ENABLED, FIELD_TLS_INSECURE, append_ca_and_client_cert};

const CONNECTED: &str = "server successfully connected to the database";
const QUERIED: &str = "server successfully ran the query";

/// Connection fields shared by `/database/connect` and `/database/query`,
/// forwarded only when non-empty.
const CONNECTION_FIELDS: [(&str, &str); 5] = [
    (keys::HOST, "host"),
    (keys::PORT, "port"),
    (keys::USERNAME, "username"),
    (keys::PASSWORD, "password"),
    (keys::DB_NAME, "db_name"),
];

pub(super) fn connect(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let builder = connection(DiagnosticCommand::DatabaseConnect, options, Report::Fixed(CONNECTED))?;
    Ok(builder.build())
}

pub(super) fn query(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let mut builder = connection(
        DiagnosticCommand::DatabaseQuery,
        options,
        Report::MessageWithBody(QUERIED),
    )?;
    let query = options.text(keys::QUERY);
    if query.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    builder.text("query", query);
    Ok(builder.build())
}

fn connection(
    command: DiagnosticCommand,
    options: &OptionSet,
    report: Report,
) -> Result<DescriptorBuilder, ValidationError> {
    let engine: DatabaseEngine = options.text(keys::ENGINE).parse()?;
    let capabilities = engine.capabilities();
    let sections = visible_sections(command, options);
    debug!("Assembling {} for engine {}", command, engine.as_str());

    let mut builder = DescriptorBuilder::server(command, report);
    builder.text("engine", engine.as_str());
    for (option, field) in CONNECTION_FIELDS {
        let value = options.text(option);
        if !value.is_empty() {
            builder.text(field, value);
        }
    }

    if !sections.contains(&SectionId::Tls) {
        return Ok(builder);
    }
    builder.text(FIELD_TLS_ENABLED, "true");
    if sections.contains(&SectionId::TlsSslMode) {
        let mode = options.text(keys::SSL_MODE).trim();
        if mode.is_empty() {
            return Err(ValidationError::MissingSslMode);
        }
        if !capabilities.ssl_modes.contains(&mode) {
            return Err(ValidationError::UnknownSslMode {
                value: mode.to_owned(),
                supported: capabilities.ssl_modes.join(", "),
            });
        }
        builder.text("ssl_mode", mode);
    }
    if sections.contains(&SectionId::TlsInsecure) {
        let insecure = if options.flag(keys::TLS_INSECURE) {
            "true"
        } else {
            "false"
        };
        builder.text(FIELD_TLS_INSECURE, insecure);
    }
    append_ca_and_client_cert(&mut builder, options, &sections);
    Ok(builder)
}
