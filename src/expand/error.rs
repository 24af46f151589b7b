use thiserror::Error;

/// Errors that can occur when parsing expansion expressions
#[derive(Debug, Error)]
pub enum ExpandParseError {
    #[error(
        "Unknown expansion command '{0}'. Valid commands are: % (type), / (path), ^ (max depth), # (max line), ? (attribute), ! (negate)"
    )]
    UnknownCommand(char),

    #[error("Invalid numeric argument '{arg}' for '{command}'")]
    InvalidNumber { command: char, arg: String },

    #[error("Missing condition after '!'")]
    EmptyNegation,
}
