//! Error types for the CLI application.

use std::fmt;

use dojo_engine::errors::GameError;
use dojo_runtime::RuntimeError;

use crate::config::ConfigError;

/// Every failure a command can report. All of them map to exit code `2`.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (stdout/stderr writes, config file reads, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// The engine or the table actor refused an operation
    Engine(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<RuntimeError> for CliError {
    fn from(error: RuntimeError) -> Self {
        match error {
            RuntimeError::UnknownPolicy(name) => {
                CliError::Config(format!("unknown policy '{}'", name))
            }
            other => CliError::Engine(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_keep_their_message() {
        let err: CliError = GameError::NotEnoughPlayers { funded: 1 }.into();
        assert_eq!(
            err.to_string(),
            "Engine error: Only 1 seat(s) have chips, need at least 2"
        );
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err: CliError = RuntimeError::UnknownPolicy("shark".into()).into();
        assert!(matches!(err, CliError::Config(ref m) if m.contains("shark")));
    }
}
