//! Core value types shared by the assembler, the transport and the presenter.
mod command;
mod descriptor;
mod engine;
mod method;
pub mod options;
mod sections;


pub use command::{DiagnosticCommand, HealthEndpoint};
pub use descriptor::{
    ExecutionMode, Expectation, ExpectedStatus, Payload, PayloadPart, PayloadValue, Report,
    RequestDescriptor, Target, TransferDirection,
};
pub use engine::{DatabaseEngine, EngineCapabilities};
pub use method::HttpMethod;
pub use options::{Attachment, OptionSet, OptionValue};
pub use sections::{SectionId, visible_sections};

pub(crate) use descriptor::DescriptorBuilder;
