use thiserror::Error;

/// Local, pre-dispatch rejection of operator input.
///
/// The `Display` text is the reason shown to the operator, so variants carry
/// the exact wording of the console rather than a developer-facing message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is not an integer: '{value}'")]
    NotAnInteger { field: &'static str, value: String },
    #[error("exit code inferior to 0")]
    ExitCodeNegative,
    #[error("download size is negative")]
    DownloadSizeNegative,
    #[error("status code out of bounds (100 - 599)")]
    StatusCodeOutOfBounds { value: i64 },
    #[error("no file selected")]
    NoFileSelected,
    #[error("only one file can be uploaded, {count} selected")]
    TooManyFiles { count: usize },
    #[error("number of threads inferior to 0")]
    ThreadCountNegative,
    #[error("memory increase size must be strictly positive")]
    RamIncreaseNotPositive,
    #[error("memory decrease size is negative")]
    RamDecreaseNegative,
    #[error("number of failures inferior to 0")]
    FailureCountNegative,
    #[error("empty hostname or IP")]
    EmptyPingHost,
    #[error("ping count is inferior to 1")]
    PingCountTooSmall,
    #[error("empty URL")]
    EmptyUrl,
    #[error("URL must start with \"http://\", \"https://\", \"ws://\" or \"wss://\"")]
    UrlSchemeNotAllowed { url: String },
    #[error("empty proxy URL")]
    EmptyProxyUrl,
    #[error("proxy URL must start with \"http://\" or \"https://\"")]
    ProxyUrlSchemeNotAllowed { url: String },
    #[error("empty host")]
    EmptyTcpHost,
    #[error("the host must not contain any scheme (i.e.: \"tcp://\" or equivalent)")]
    TcpHostHasScheme { host: String },
    #[error("echo body size can't be inferior or equal to 0")]
    EchoBodySizeNotPositive,
    #[error("empty query")]
    EmptyQuery,
    #[error("no database engine selected")]
    MissingEngine,
    #[error("unknown database engine '{value}', must be one of: {supported}")]
    UnknownEngine { value: String, supported: String },
    #[error("no TLS mode selected")]
    MissingSslMode,
    #[error("unknown TLS mode '{value}', must be one of: {supported}")]
    UnknownSslMode { value: String, supported: String },
    #[error("no method selected")]
    MissingMethod,
    #[error("unknown method '{value}'")]
    UnknownMethod { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
