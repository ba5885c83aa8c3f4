use tracing::debug;

use crate::domain::options::keys;
use crate::domain::{
    DescriptorBuilder, DiagnosticCommand, ExecutionMode, Expectation, ExpectedStatus, HttpMethod,
    OptionSet, Report, RequestDescriptor, SectionId, visible_sections,
};
use crate::error::ValidationError;

use super::tls::{FIELD_TLS_ENABLED, append_ca_and_client_cert, append_insecure_flag};
use super::validators::{
    Bound, bounded_integer, http_or_websocket_url, matches_http_url, matches_websocket_url,
    proxy_url, tcp_host, trimmed,
};

/// `/request`: the server issues an HTTP or websocket request on our behalf.
pub(super) fn http_request(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let url = http_or_websocket_url(options.text(keys::URL))?;
    let sections = visible_sections(DiagnosticCommand::HttpRequest, options);

    let mut builder = DescriptorBuilder::server(
        DiagnosticCommand::HttpRequest,
        Report::MessageWithBody("success"),
    );
    builder.text("url", url);
    if !matches_websocket_url(url) {
        let method = match trimmed(options.text(keys::METHOD)) {
            Some(raw) => raw.parse::<HttpMethod>()?,
            None => HttpMethod::Get,
        };
        builder.text("method", method.as_str());
    }
    if let Some(timeout) = trimmed(options.text(keys::CONNECTION_TIMEOUT)) {
        builder.text("connection_timeout", timeout);
    }
    if options.flag(keys::ECHO_HEADERS) {
        builder.text("echo_headers", "true");
    }
    if options.flag(keys::ECHO_BODY) {
        builder.text("echo_body", "true");
    }

    if sections.contains(&SectionId::Tls) {
        append_insecure_flag(&mut builder, options, &sections);
        append_ca_and_client_cert(&mut builder, options, &sections);
    }

    if sections.contains(&SectionId::Proxy) {
        let proxy = proxy_url(options.text(keys::PROXY_URL))?;
        builder.text("proxy_url", proxy);
        let username = options.text(keys::PROXY_USERNAME);
        if !username.is_empty() {
            builder.text("proxy_username", username);
        }
        let password = options.text(keys::PROXY_PASSWORD);
        if !password.is_empty() {
            builder.text("proxy_password", password);
        }
    }
    Ok(builder.build())
}

/// `/tcp`: the server opens a raw socket (optionally TLS) to `host`.
pub(super) fn tcp_probe(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let host = tcp_host(options.text(keys::HOST))?;
    let sections = visible_sections(DiagnosticCommand::TcpProbe, options);

    let mut builder =
        DescriptorBuilder::server(DiagnosticCommand::TcpProbe, Report::MessageWithBody("success"));
    builder.text("host", host);
    if let Some(timeout) = trimmed(options.text(keys::CONNECTION_TIMEOUT)) {
        builder.text("connection_timeout", timeout);
    }
    if options.flag(keys::ECHO_BODY) {
        builder.text("echo_body", "true");
        if sections.contains(&SectionId::EchoBodySize)
            && let Some(size) = bounded_integer(
                "echo body size",
                options.text(keys::ECHO_BODY_SIZE),
                Bound::StrictlyPositive,
                ValidationError::EchoBodySizeNotPositive,
            )?
        {
            builder.text("echo_body_size", size.to_string());
        }
    }

    if sections.contains(&SectionId::Tls) {
        builder.text(FIELD_TLS_ENABLED, "true");
        append_insecure_flag(&mut builder, options, &sections);
        append_ca_and_client_cert(&mut builder, options, &sections);
    }
    Ok(builder.build())
}

/// Connectivity/CORS probe straight from the client to `url`.
pub(super) fn cors_probe(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let method: HttpMethod = options.text(keys::METHOD).parse()?;
    let url = http_or_websocket_url(options.text(keys::URL))?;

    if matches_http_url(url) {
        debug!("Probe {} {} as request/response", method, url);
        let mut builder = DescriptorBuilder::external(
            DiagnosticCommand::CorsProbe,
            url.to_owned(),
            method,
            ExecutionMode::RequestResponse,
            Report::ProbeResponse,
        );
        builder.expect(Expectation {
            success: ExpectedStatus::AnySuccess,
            partial: None,
        });
        return Ok(builder.build());
    }

    debug!("Probe {} as websocket", url);
    let mut builder = DescriptorBuilder::external(
        DiagnosticCommand::CorsProbe,
        url.to_owned(),
        method,
        ExecutionMode::BidirectionalProbe,
        Report::ProbeOpen,
    );
    // Any status answering the upgrade means the handshake was refused.
    builder.expect(Expectation {
        success: ExpectedStatus::Exact(101),
        partial: None,
    });
    Ok(builder.build())
}
