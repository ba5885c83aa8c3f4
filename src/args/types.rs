use clap::ValueEnum;

use crate::domain::HealthEndpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HealthTarget {
    Started,
    Alive,
    Ready,
}

impl From<HealthTarget> for HealthEndpoint {
    fn from(value: HealthTarget) -> Self {
        match value {
            HealthTarget::Started => HealthEndpoint::Started,
            HealthTarget::Alive => HealthEndpoint::Alive,
            HealthTarget::Ready => HealthEndpoint::Ready,
        }
    }
}
