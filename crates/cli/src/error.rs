//! Error types and exit codes for routectl

use openrouting_errors::{ErrorCategory, RoutingError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Process exit code for a failed command.
///
/// | Code | Meaning |
/// |------|---------|
/// | 2 | unknown or duplicate device family |
/// | 3 | transport failure (open, write, close) |
/// | 4 | value not representable on the wire |
/// | 5 | driver closed or failed |
/// | 6 | configuration |
/// | 1 | anything else |
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(routing) = error.downcast_ref::<RoutingError>() {
        return match routing.category() {
            ErrorCategory::Registry => 2,
            ErrorCategory::Transport => 3,
            ErrorCategory::Protocol => 4,
            ErrorCategory::Driver => 5,
            ErrorCategory::Config => 6,
        };
    }
    match error.downcast_ref::<CliError>() {
        Some(CliError::InvalidConfiguration(_)) | Some(CliError::YamlError(_)) => 6,
        _ => 1,
    }
}
