/// Error types for building SagePay requests and configuration.
///
/// Gateway refusals are not errors: they are classified into
/// [`Outcome`](crate::outcome::Outcome) values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The environment name is not one of the known values.
    #[error("Unknown SagePay environment '{0}'; expected DEVELOPMENT, TEST, LIVE or PRODUCTION")]
    UnknownEnvironment(String),

    /// A field required to build the request is absent or empty.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A required configuration value is absent.
    #[error("Missing configuration value: {0}")]
    MissingConfig(&'static str),

    /// The amount could not be parsed as a monetary value.
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    /// The generated VendorTxCode would exceed the gateway limit.
    #[error("VendorTxCode '{code}' is {len} characters; the gateway accepts at most {max}")]
    VendorTxCodeTooLong {
        code: String,
        len: usize,
        max: usize,
    },

    /// URL parsing errors.
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
}

/// A specialized `Result` type for SagePay core operations.
pub type Result<T> = std::result::Result<T, Error>;
