//! Command parsing errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("No command given")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown argument '{token}' for '{path}'")]
    UnknownArgument { path: String, token: String },

    #[error("Incomplete command, expected: {usage}")]
    Incomplete { usage: String },

    #[error("Invalid number for <{name}>: {value}")]
    InvalidFloat { name: String, value: String },

    #[error("<{name}> must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: String,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Too many arguments for '{path}': {extra}")]
    TrailingArguments { path: String, extra: String },
}
