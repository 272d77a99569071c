//! CLI error type.

use std::fmt;
use std::io;

use sellermap::api::ApiError;
use sellermap::config::ConfigFileError;
use sellermap::geo::GeoError;
use sellermap::logging::LoggingError;
use sellermap::orchestrator::OrchestratorError;

/// Errors reported to the user by the `sellermap` binary.
#[derive(Debug)]
pub enum CliError {
    /// Configuration file or setting problem.
    Config(String),

    /// Bad command line or stdin input.
    InvalidInput(String),

    /// Backend request failed.
    Api(ApiError),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// The orchestrator stopped unexpectedly.
    Orchestrator(OrchestratorError),

    /// Reading stdin failed.
    Io(io::Error),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Api(e) => write!(f, "API error: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Orchestrator(e) => write!(f, "Orchestrator error: {}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::RuntimeCreation(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Api(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Orchestrator(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Config(_) | CliError::InvalidInput(_) | CliError::RuntimeCreation(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::InvalidInput(e.to_string())
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        CliError::Api(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<OrchestratorError> for CliError {
    fn from(e: OrchestratorError) -> Self {
        CliError::Orchestrator(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
