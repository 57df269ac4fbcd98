//! Command parsing, results, and the literal/argument command tree.

pub mod error;
pub mod tree;

pub use error::CommandError;
pub use tree::{ArgValue, ArgumentType, Arguments, CommandNode, CommandTree, Invocation};

/// Context passed to a command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Name of the player executing the command. `None` for the console.
    pub sender: Option<String>,
    /// Arguments parsed from the command line.
    pub args: Arguments,
}

/// Result returned by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command executed successfully.
    pub success: bool,
    /// Messages to send back to the command sender.
    pub messages: Vec<String>,
}

impl CommandResult {
    /// Create a successful result with a single message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            messages: vec![message.into()],
        }
    }

    /// Create a failed result with a single message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![message.into()],
        }
    }

    /// Create a successful result with no feedback.
    pub fn silent() -> Self {
        Self {
            success: true,
            messages: Vec::new(),
        }
    }

    /// Append another feedback line.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Numeric status: 1 on success, 0 on failure.
    pub fn status(&self) -> i32 {
        i32::from(self.success)
    }
}

impl From<CommandError> for CommandResult {
    fn from(err: CommandError) -> Self {
        CommandResult::err(err.to_string())
    }
}
