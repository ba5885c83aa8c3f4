use crate::domain::options::keys;
use crate::domain::{
    DescriptorBuilder, DiagnosticCommand, Expectation, ExpectedStatus, HealthEndpoint, OptionSet,
    Report, RequestDescriptor, TransferDirection,
};
use crate::error::ValidationError;

use super::validators::{
    Bound, DEFAULT_STATUS_CODE, bounded_integer, single_file, status_code, trimmed,
};

const DEFAULT_SLEEP_DURATION: &str = "1s";
const PARTIAL_RELEASE_STATUS: u16 = 206;

pub(super) fn crash(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let mut builder = DescriptorBuilder::server(
        DiagnosticCommand::Crash,
        Report::Fixed("ok, server will crash in a second"),
    );
    if let Some(code) = bounded_integer(
        "exit code",
        options.text(keys::CODE),
        Bound::NonNegative,
        ValidationError::ExitCodeNegative,
    )? {
        builder.query("code", code.to_string());
    }
    if let Some(timeout) = trimmed(options.text(keys::TIMEOUT)) {
        builder.query("timeout", timeout);
    }
    Ok(builder.build())
}

pub(super) fn download(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let mut builder = DescriptorBuilder::server(DiagnosticCommand::Download, Report::Transfer);
    builder.transfer(TransferDirection::Download);
    if let Some(size) = bounded_integer(
        "download size",
        options.text(keys::SIZE),
        Bound::NonNegative,
        ValidationError::DownloadSizeNegative,
    )? {
        builder.query("size", size.to_string());
    }
    Ok(builder.build())
}

pub(super) fn sleep(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let duration = trimmed(options.text(keys::DURATION));
    let code = status_code(options.text(keys::CODE))?;

    let mut builder = DescriptorBuilder::server(
        DiagnosticCommand::Sleep,
        Report::Message(format!(
            "server slept for {}",
            duration.unwrap_or(DEFAULT_SLEEP_DURATION)
        )),
    );
    if let Some(duration) = duration {
        builder.query("duration", duration);
    }
    if let Some(code) = code {
        builder.query("code", code.to_string());
    }
    builder.expect(Expectation {
        success: ExpectedStatus::Exact(code.unwrap_or(DEFAULT_STATUS_CODE)),
        partial: None,
    });
    Ok(builder.build())
}

pub(super) fn status_code_command(
    options: &OptionSet,
) -> Result<RequestDescriptor, ValidationError> {
    let code = status_code(options.text(keys::CODE))?;
    let expected = code.unwrap_or(DEFAULT_STATUS_CODE);
    let mut builder = DescriptorBuilder::server(
        DiagnosticCommand::StatusCode,
        Report::Message(format!(
            "server responded with correct status code {}",
            expected
        )),
    );
    if let Some(code) = code {
        builder.query("code", code.to_string());
    }
    builder.expect(Expectation {
        success: ExpectedStatus::Exact(expected),
        partial: None,
    });
    Ok(builder.build())
}

pub(super) fn upload(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let file = single_file(options.files(keys::FILE))?;
    let mut builder = DescriptorBuilder::server(DiagnosticCommand::Upload, Report::Transfer);
    builder.transfer(TransferDirection::Upload);
    builder.file("file", file.clone());
    Ok(builder.build())
}

pub(super) fn cpu_load(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let mut builder =
        DescriptorBuilder::server(DiagnosticCommand::CpuLoad, Report::Fixed("server CPU loaded"));
    if let Some(threads) = bounded_integer(
        "number of threads",
        options.text(keys::THREADS),
        Bound::NonNegative,
        ValidationError::ThreadCountNegative,
    )? {
        builder.query("nb_threads", threads.to_string());
    }
    if let Some(timeout) = trimmed(options.text(keys::TIMEOUT)) {
        builder.query("timeout", timeout);
    }
    Ok(builder.build())
}

pub(super) fn ram_increase(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let mut builder = DescriptorBuilder::server(
        DiagnosticCommand::RamIncrease,
        Report::MessageWithBody("server memory increased"),
    );
    if let Some(size) = bounded_integer(
        "memory increase size",
        options.text(keys::SIZE),
        Bound::StrictlyPositive,
        ValidationError::RamIncreaseNotPositive,
    )? {
        builder.query("size", size.to_string());
    }
    Ok(builder.build())
}

pub(super) fn ram_decrease(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let mut builder = DescriptorBuilder::server(
        DiagnosticCommand::RamDecrease,
        Report::MessageWithBody("server memory decreased"),
    );
    if let Some(size) = bounded_integer(
        "memory decrease size",
        options.text(keys::SIZE),
        Bound::NonNegative,
        ValidationError::RamDecreaseNegative,
    )? {
        builder.query("size", size.to_string());
    }
    // 206: the server could not release everything it was asked to.
    builder.expect(Expectation {
        success: ExpectedStatus::Exact(DEFAULT_STATUS_CODE),
        partial: Some(PARTIAL_RELEASE_STATUS),
    });
    Ok(builder.build())
}

pub(super) fn ram_leak(options: &OptionSet) -> RequestDescriptor {
    let mut builder = DescriptorBuilder::server(
        DiagnosticCommand::RamLeak,
        Report::Fixed("server memory leak triggered"),
    );
    if let Some(size) = trimmed(options.text(keys::SIZE)) {
        builder.query("size", size);
    }
    if let Some(frequency) = trimmed(options.text(keys::FREQUENCY)) {
        builder.query("frequency", frequency);
    }
    builder.build()
}

pub(super) fn fixed(command: DiagnosticCommand, report: Report) -> RequestDescriptor {
    DescriptorBuilder::server(command, report).build()
}

pub(super) fn health_get(endpoint: HealthEndpoint) -> RequestDescriptor {
    let mut builder =
        DescriptorBuilder::server(DiagnosticCommand::HealthGet(endpoint), Report::StatusLine);
    builder.expect(Expectation {
        success: ExpectedStatus::AnySuccess,
        partial: None,
    });
    builder.build()
}

pub(super) fn health_set(
    endpoint: HealthEndpoint,
    options: &OptionSet,
) -> Result<RequestDescriptor, ValidationError> {
    let mut builder = DescriptorBuilder::server(
        DiagnosticCommand::HealthSet(endpoint),
        Report::Fixed("healthcheck configured"),
    );
    let fail = if options.flag(keys::FAIL) {
        "true"
    } else {
        "false"
    };
    builder.query("fail", fail);
    if let Some(failures) = bounded_integer(
        "number of failures",
        options.text(keys::FAILURES),
        Bound::NonNegative,
        ValidationError::FailureCountNegative,
    )? {
        builder.query("nb_failures", failures.to_string());
    }
    if let Some(delay) = trimmed(options.text(keys::DELAY)) {
        builder.query("delay", delay);
    }
    Ok(builder.build())
}

pub(super) fn ping(options: &OptionSet) -> Result<RequestDescriptor, ValidationError> {
    let host = options.text(keys::HOST);
    if host.is_empty() {
        return Err(ValidationError::EmptyPingHost);
    }
    let mut builder =
        DescriptorBuilder::server(DiagnosticCommand::Ping, Report::MessageWithBody("success"));
    builder.query("host", host);
    if let Some(count) = bounded_integer(
        "ping count",
        options.text(keys::COUNT),
        Bound::AtLeastOne,
        ValidationError::PingCountTooSmall,
    )? {
        builder.query("count", count.to_string());
    }
    Ok(builder.build())
}
