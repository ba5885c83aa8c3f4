use serde::Serialize;

use super::{Attachment, DiagnosticCommand, HttpMethod};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Route on the diagnostic server.
    Server(&'static str),
    /// Absolute URL chosen by the operator (connectivity probe).
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadValue {
    Text(String),
    File(Attachment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadPart {
    pub name: &'static str,
    pub value: PayloadValue,
}

/// Multipart body: named scalar fields and named attachments, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    parts: Vec<PayloadPart>,
}

impl Payload {
    #[must_use]
    pub fn parts(&self) -> &[PayloadPart] {
        &self.parts
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PayloadValue> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| &part.value)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(PayloadValue::Text(value)) => Some(value),
            Some(PayloadValue::File(_)) | None => None,
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.parts.iter().map(|part| part.name).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Upload,
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    RequestResponse,
    /// Open a websocket, report whether it opened, close with 1000.
    BidirectionalProbe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedStatus {
    Exact(u16),
    /// Any 2xx.
    AnySuccess,
}

impl ExpectedStatus {
    #[must_use]
    pub const fn matches(self, status: u16) -> bool {
        match self {
            ExpectedStatus::Exact(code) => code == status,
            ExpectedStatus::AnySuccess => status >= 200 && status < 300,
        }
    }
}

/// Status codes the classifier treats as success or partial success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    pub success: ExpectedStatus,
    pub partial: Option<u16>,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            success: ExpectedStatus::Exact(200),
            partial: None,
        }
    }
}

/// How a terminal response is turned into operator text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Fixed sentence, server body ignored.
    Fixed(&'static str),
    /// Sentence computed at assembly time.
    Message(String),
    /// Sentence followed by the server body.
    MessageWithBody(&'static str),
    /// Server body only.
    Body,
    /// "ok (status code: N)" on success, the status and body otherwise.
    StatusLine,
    /// Size, duration and throughput of the transfer.
    Transfer,
    /// Status, response headers and content of a probed URL.
    ProbeResponse,
    /// Websocket opened.
    ProbeOpen,
}

/// Validated, fully resolved shape of one outbound call.
///
/// Only the assembler builds descriptors, and only from input that passed
/// every validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    command: DiagnosticCommand,
    method: HttpMethod,
    target: Target,
    query: Vec<(&'static str, String)>,
    payload: Option<Payload>,
    expectation: Expectation,
    transfer: Option<TransferDirection>,
    mode: ExecutionMode,
    report: Report,
}

impl RequestDescriptor {
    #[must_use]
    pub const fn command(&self) -> DiagnosticCommand {
        self.command
    }

    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.target
    }

    #[must_use]
    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Value of a query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    #[must_use]
    pub const fn expectation(&self) -> Expectation {
        self.expectation
    }

    #[must_use]
    pub const fn transfer(&self) -> Option<TransferDirection> {
        self.transfer
    }

    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    #[must_use]
    pub const fn report(&self) -> &Report {
        &self.report
    }

    /// Encoded query string, without the leading `?`.
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Route plus query, e.g. `/sleep?duration=2s&code=503`.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        let base = match &self.target {
            Target::Server(path) => (*path).to_owned(),
            Target::External(url) => url.clone(),
        };
        if self.query.is_empty() {
            base
        } else {
            format!("{}?{}", base, self.query_string())
        }
    }
}

pub(crate) struct DescriptorBuilder {
    command: DiagnosticCommand,
    method: HttpMethod,
    target: Target,
    query: Vec<(&'static str, String)>,
    payload: Option<Payload>,
    expectation: Expectation,
    transfer: Option<TransferDirection>,
    mode: ExecutionMode,
    report: Report,
}

impl DescriptorBuilder {
    pub(crate) fn server(command: DiagnosticCommand, report: Report) -> Self {
        Self {
            command,
            method: command.method(),
            target: Target::Server(command.path().unwrap_or("/")),
            query: Vec::new(),
            payload: None,
            expectation: Expectation::default(),
            transfer: None,
            mode: ExecutionMode::RequestResponse,
            report,
        }
    }

    pub(crate) fn external(
        command: DiagnosticCommand,
        url: String,
        method: HttpMethod,
        mode: ExecutionMode,
        report: Report,
    ) -> Self {
        Self {
            command,
            method,
            target: Target::External(url),
            query: Vec::new(),
            payload: None,
            expectation: Expectation::default(),
            transfer: None,
            mode,
            report,
        }
    }

    pub(crate) fn query(&mut self, name: &'static str, value: impl Into<String>) {
        self.query.push((name, value.into()));
    }

    /// Switches the body to multipart; idempotent.
    pub(crate) fn multipart(&mut self) -> &mut Payload {
        self.payload.get_or_insert_with(Payload::default)
    }

    pub(crate) fn text(&mut self, name: &'static str, value: impl Into<String>) {
        self.multipart().parts.push(PayloadPart {
            name,
            value: PayloadValue::Text(value.into()),
        });
    }

    pub(crate) fn file(&mut self, name: &'static str, attachment: Attachment) {
        self.multipart().parts.push(PayloadPart {
            name,
            value: PayloadValue::File(attachment),
        });
    }

    pub(crate) const fn expect(&mut self, expectation: Expectation) {
        self.expectation = expectation;
    }

    pub(crate) const fn transfer(&mut self, direction: TransferDirection) {
        self.transfer = Some(direction);
    }

    pub(crate) fn build(self) -> RequestDescriptor {
        RequestDescriptor {
            command: self.command,
            method: self.method,
            target: self.target,
            query: self.query,
            payload: self.payload,
            expectation: self.expectation,
            transfer: self.transfer,
            mode: self.mode,
            report: self.report,
        }
    }
}
