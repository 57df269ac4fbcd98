//! Plugin errors. Every variant is reported back to the caller as a failed
//! command result; none of them abort the host.

use creative_utils_api::CommandResult;
use creative_utils_command::CommandError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreativeUtilsError {
    /// The caller is a player, but not in creative mode.
    #[error("This command only works in Creative mode!")]
    NotCreative,

    /// The caller has no player identity (console, or a player that left).
    #[error("This command only works in Creative mode!")]
    NoPlayer,

    #[error("{0} attribute is unavailable")]
    AttributeUnavailable(&'static str),

    #[error("Missing argument <{0}>")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<CreativeUtilsError> for CommandResult {
    fn from(err: CreativeUtilsError) -> Self {
        CommandResult::err(err.to_string())
    }
}
